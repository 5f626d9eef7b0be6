// ============================================================================
// Module : api
// ============================================================================
// Gère les appels aux sources de données externes
// ============================================================================

pub mod sheets; // Google Sheets (export CSV)

// Re-export des fonctions principales
pub use sheets::{fetch_records, SheetReference};
