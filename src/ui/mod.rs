// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;             // Gestion des événements clavier
pub mod dashboard;          // Rendu des écrans (dashboard, settings)
pub mod candlestick_layout; // Géométrie des chandeliers (indépendante du rendu)
pub mod candlestick_text;   // Rendu des chandeliers japonais (Unicode text)

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
pub use candlestick_layout::{chart_layout, layout, CandleGeometry, ChartLayout};
