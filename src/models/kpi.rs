// ============================================================================
// Indicateurs du dashboard (KPI)
// ============================================================================
// Score du jour, moyenne 7 jours, meilleur et pire jour.
// Calculés à partir des totaux journaliers ; un NaN dans les totaux se
// propage dans le KPI concerné (pas de filtrage silencieux).
// ============================================================================

use super::numeric::{propagating_max, propagating_min};
use super::record::DailyRecord;

/// Nombre de jours pris en compte pour la moyenne glissante
pub const AVERAGE_WINDOW: usize = 7;

/// Nombre de lignes affichées dans le tableau "Recent Entries"
pub const RECENT_ENTRIES: usize = 20;

/// Les 4 indicateurs affichés en tête du dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub today: f64,
    pub seven_day_avg: f64,
    pub best_day: f64,
    pub worst_day: f64,
}

impl Kpis {
    /// Calcule les KPI ; None si aucun enregistrement
    pub fn compute(records: &[DailyRecord]) -> Option<Kpis> {
        let last = records.last()?;

        let recent = &records[records.len().saturating_sub(AVERAGE_WINDOW)..];
        let sum: f64 = recent.iter().map(|r| r.daily_total).sum();
        let seven_day_avg = sum / recent.len() as f64;

        Some(Kpis {
            today: last.daily_total,
            seven_day_avg,
            best_day: propagating_max(records.iter().map(|r| r.daily_total)),
            worst_day: propagating_min(records.iter().map(|r| r.daily_total)),
        })
    }

    /// Paires (titre, valeur formatée) dans l'ordre d'affichage
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Today's Score", format_score(self.today)),
            ("7-Day Avg", format!("{:.2}", self.seven_day_avg)),
            ("Best Day", format_score(self.best_day)),
            ("Worst Day", format_score(self.worst_day)),
        ]
    }
}

/// Les `count` derniers enregistrements, du plus récent au plus ancien
pub fn recent_entries(records: &[DailyRecord], count: usize) -> Vec<&DailyRecord> {
    records[records.len().saturating_sub(count)..]
        .iter()
        .rev()
        .collect()
}

/// Affiche un score sans décimales inutiles (40, 4.5, NaN)
pub fn format_score(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, total: f64) -> DailyRecord {
        DailyRecord {
            date: date.to_string(),
            open: total,
            close: total,
            high: total,
            low: total,
            personal_well_being: 0.0,
            relationships: 0.0,
            work_career: 0.0,
            health_fitness: 0.0,
            hobbies_interests: 0.0,
            personal_finance: 0.0,
            learning_growth: 0.0,
            home_environment: 0.0,
            daily_total: total,
        }
    }

    #[test]
    fn test_kpis_empty() {
        assert!(Kpis::compute(&[]).is_none());
    }

    #[test]
    fn test_kpis_values() {
        let records: Vec<DailyRecord> = (1..=10)
            .map(|i| record(&format!("2024-01-{:02}", i), i as f64))
            .collect();

        let kpis = Kpis::compute(&records).unwrap();
        assert_eq!(kpis.today, 10.0);
        // Moyenne de 4..=10
        assert_eq!(kpis.seven_day_avg, 7.0);
        assert_eq!(kpis.best_day, 10.0);
        assert_eq!(kpis.worst_day, 1.0);
    }

    #[test]
    fn test_kpis_short_history() {
        let records = vec![record("2024-01-01", 10.0), record("2024-01-02", 20.0)];
        let kpis = Kpis::compute(&records).unwrap();
        assert_eq!(kpis.seven_day_avg, 15.0);
    }

    #[test]
    fn test_kpis_nan_propagates() {
        let records = vec![record("2024-01-01", 10.0), record("2024-01-02", f64::NAN)];
        let kpis = Kpis::compute(&records).unwrap();
        assert!(kpis.today.is_nan());
        assert!(kpis.seven_day_avg.is_nan());
        assert!(kpis.best_day.is_nan());
        assert!(kpis.worst_day.is_nan());
    }

    #[test]
    fn test_cards_formatting() {
        let kpis = Kpis {
            today: 40.0,
            seven_day_avg: 41.0 / 3.0,
            best_day: 50.5,
            worst_day: -2.0,
        };
        let cards = kpis.cards();
        assert_eq!(cards[0], ("Today's Score", "40".to_string()));
        assert_eq!(cards[1], ("7-Day Avg", "13.67".to_string()));
        assert_eq!(cards[2].1, "50.5");
        assert_eq!(cards[3].1, "-2");
    }

    #[test]
    fn test_recent_entries_most_recent_first() {
        let records: Vec<DailyRecord> = (1..=25)
            .map(|i| record(&format!("d{}", i), i as f64))
            .collect();

        let recent = recent_entries(&records, RECENT_ENTRIES);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].date, "d25");
        assert_eq!(recent[19].date, "d6");
    }
}
