// ============================================================================
// LifeTracker - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;         // Export CSV Google Sheets
pub mod models;      // Structures de données
pub mod synthesizer; // Lignes brutes -> enregistrements OHLC
pub mod settings;    // Réglages persistés (lien de la feuille)
pub mod app;         // État de l'application
pub mod ui;          // Interface utilisateur
