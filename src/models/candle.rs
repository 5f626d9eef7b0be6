// ============================================================================
// Trait : Candle
// ============================================================================
// Tout ce qui expose date / open / high / low / close peut être dessiné
// en chandelier. Le moteur de mise en page est générique sur ce trait.
//
// CONCEPT RUST : Traits comme interface
// - Le moteur ne dépend pas de DailyRecord directement
// - Les tests peuvent fournir leurs propres bougies minimales
// ============================================================================

use super::record::DailyRecord;

/// Une bougie OHLC datée
pub trait Candle {
    /// Date telle que stockée (ISO normalisée ou texte brut)
    fn date(&self) -> &str;
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
}

impl Candle for DailyRecord {
    fn date(&self) -> &str {
        &self.date
    }

    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }
}
