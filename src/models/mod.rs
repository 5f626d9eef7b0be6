// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod candle;  // Trait Candle (entrée du moteur de mise en page)
pub mod date;    // Parsing et normalisation des dates du tableur
pub mod kpi;     // Indicateurs du dashboard
pub mod numeric; // Coercion numérique, extrema propageant le NaN
pub mod record;  // DailyRecord et catégories
pub mod row;     // Lignes brutes du tableur

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lifetracker::models::record::DailyRecord;
// On peut faire : use lifetracker::models::DailyRecord;
pub use candle::Candle;
pub use kpi::Kpis;
pub use record::{Category, DailyRecord};
pub use row::{Cell, RawRow};
