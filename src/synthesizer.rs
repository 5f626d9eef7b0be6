// ============================================================================
// Synthétiseur d'enregistrements
// ============================================================================
// Transforme les lignes brutes du tableur en série journalière ordonnée,
// avec des champs open/high/low/close synthétisés pour le graphique.
//
// ALGORITHME (une seule passe, O(n)) :
// 1. Résout la cellule date via les alias (Date, date, DAY) ; sinon la ligne est ignorée
// 2. Normalise la date en ISO, ou garde le texte brut si illisible
// 3. Coerce les 9 champs numériques (8 catégories + total), NaN si illisible
// 4. high / low = max / min des 9 champs (le NaN se propage)
// 5. open = close de la veille (ou le total du jour pour le premier)
// 6. close = total du jour
//
// CONCEPT RUST : fold avec accumulateur
// - Le "close précédent" est le seul état qui traverse les lignes
// - Il vit dans l'accumulateur du fold, donc limité à un seul appel
// ============================================================================

use tracing::{debug, warn};

use crate::models::date::normalize_date;
use crate::models::numeric::{propagating_max, propagating_min};
use crate::models::row::{DAILY_TOTAL_COLUMN, DATE_ALIASES};
use crate::models::{Category, Cell, DailyRecord, RawRow};

/// Convertit les lignes brutes en enregistrements journaliers
///
/// Fonction totale : les lignes malformées sont ignorées (date absente)
/// ou dégradées (NaN), jamais d'erreur.
///
/// # Exemple
/// let records = synthesize(&rows);
/// assert_eq!(records[0].open, records[0].close);
pub fn synthesize(rows: &[RawRow]) -> Vec<DailyRecord> {
    let (records, _) = rows.iter().fold(
        (Vec::with_capacity(rows.len()), None::<f64>),
        |(mut records, previous_close), row| match synthesize_row(row, previous_close) {
            Some(record) => {
                let close = record.close;
                records.push(record);
                (records, Some(close))
            }
            None => (records, previous_close),
        },
    );

    let skipped = rows.len() - records.len();
    if skipped > 0 {
        warn!(skipped, total = rows.len(), "Skipped rows without a date cell");
    }

    let degraded = records
        .iter()
        .filter(|r| r.numeric_fields().iter().any(|v| v.is_nan()))
        .count();
    if degraded > 0 {
        debug!(degraded, "Records carry unparseable numeric cells");
    }

    debug!(records = records.len(), "Finished synthesizing records");
    records
}

/// Construit un enregistrement à partir d'une ligne et du close précédent
///
/// Retourne None si la ligne n'a pas de cellule date reconnaissable
fn synthesize_row(row: &RawRow, previous_close: Option<f64>) -> Option<DailyRecord> {
    let date_cell = row.first_present(&DATE_ALIASES)?;
    let date = normalize_date(&date_cell.to_text());

    let scores = Category::ALL.map(|category| numeric_cell(row, category.label()));
    let daily_total = numeric_cell(row, DAILY_TOTAL_COLUMN);

    let fields = scores.iter().copied().chain(std::iter::once(daily_total));
    let high = propagating_max(fields.clone());
    let low = propagating_min(fields);

    let close = daily_total;
    let open = previous_close.unwrap_or(daily_total);

    Some(DailyRecord {
        date,
        open,
        close,
        high,
        low,
        personal_well_being: scores[0],
        relationships: scores[1],
        work_career: scores[2],
        health_fitness: scores[3],
        hobbies_interests: scores[4],
        personal_finance: scores[5],
        learning_growth: scores[6],
        home_environment: scores[7],
        daily_total,
    })
}

/// Valeur numérique d'une colonne ; colonne absente : NaN
fn numeric_cell(row: &RawRow, label: &str) -> f64 {
    row.get(label).map(Cell::to_number).unwrap_or(f64::NAN)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Construit une ligne complète : 8 scores + total
    fn row(date: &str, scores: [f64; 8], total: f64) -> RawRow {
        let mut row = RawRow::new();
        row.insert("Date", Cell::from(date));
        for (category, score) in Category::ALL.iter().zip(scores) {
            row.insert(category.label(), Cell::Number(score));
        }
        row.insert(DAILY_TOTAL_COLUMN, Cell::Number(total));
        row
    }

    #[test]
    fn test_two_day_scenario() {
        let rows = vec![
            row("2024-01-01", [5.0, 4.0, 6.0, 5.0, 3.0, 7.0, 5.0, 5.0], 40.0),
            row("2024-01-02", [6.0, 6.0, 7.0, 6.0, 5.0, 8.0, 6.0, 6.0], 50.0),
        ];

        let records = synthesize(&rows);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].date, "2024-01-01");
        assert_eq!(records[0].open, 40.0);
        assert_eq!(records[0].close, 40.0);
        assert_eq!(records[0].high, 40.0);
        assert_eq!(records[0].low, 3.0);

        assert_eq!(records[1].date, "2024-01-02");
        assert_eq!(records[1].open, 40.0);
        assert_eq!(records[1].close, 50.0);
        assert_eq!(records[1].high, 50.0);
        assert_eq!(records[1].low, 5.0);
    }

    #[test]
    fn test_open_close_chaining() {
        let rows: Vec<RawRow> = [12.0, 30.0, 18.0, 18.0, 25.0]
            .iter()
            .enumerate()
            .map(|(i, total)| row(&format!("2024-02-{:02}", i + 1), [1.0; 8], *total))
            .collect();

        let records = synthesize(&rows);
        assert_eq!(records[0].open, records[0].close);
        for i in 1..records.len() {
            assert_eq!(records[i].open, records[i - 1].close);
            assert_eq!(records[i].close, records[i].daily_total);
        }
    }

    #[test]
    fn test_high_low_bound_close() {
        let rows = vec![
            row("2024-01-01", [9.0, -3.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0], 18.0),
            row("2024-01-02", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0], 2.0),
            row("2024-01-03", [-5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], -5.0),
        ];

        let records = synthesize(&rows);
        for record in &records {
            assert!(record.high >= record.close);
            assert!(record.low <= record.close);
        }
        // Le premier jour n'a pas de veille : open est aussi encadré
        assert!(records[0].low <= records[0].open && records[0].open <= records[0].high);
        assert_eq!(records[0].high, 18.0);
        assert_eq!(records[0].low, -3.0);
    }

    #[test]
    fn test_rows_without_date_are_dropped() {
        let mut dateless = RawRow::new();
        for category in Category::ALL {
            dateless.insert(category.label(), Cell::Number(1.0));
        }
        dateless.insert(DAILY_TOTAL_COLUMN, Cell::Number(99.0));

        let rows = vec![
            row("2024-01-01", [1.0; 8], 8.0),
            dateless,
            row("2024-01-03", [2.0; 8], 16.0),
        ];

        let records = synthesize(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2024-01-01");
        assert_eq!(records[1].date, "2024-01-03");
        // Le chaînage saute la ligne ignorée
        assert_eq!(records[1].open, 8.0);
    }

    #[test]
    fn test_unparseable_date_kept_verbatim() {
        let rows = vec![row("sometime in spring", [1.0; 8], 8.0)];
        let records = synthesize(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "sometime in spring");
    }

    #[test]
    fn test_date_normalized_to_iso() {
        let rows = vec![row("1/5/2024", [1.0; 8], 8.0)];
        assert_eq!(synthesize(&rows)[0].date, "2024-01-05");
    }

    #[test]
    fn test_two_digit_year_normalized() {
        let rows = vec![
            row("1/5/24", [1.0; 8], 8.0),
            row("01/06/2024 10:00", [1.0; 8], 9.0),
        ];
        let records = synthesize(&rows);
        assert_eq!(records[0].date, "2024-01-05");
        assert_eq!(records[1].date, "2024-01-06");
    }

    #[test]
    fn test_date_alias_lookup() {
        let mut day_row = RawRow::new();
        day_row.insert("DAY", Cell::from("2024-04-01"));
        day_row.insert(DAILY_TOTAL_COLUMN, Cell::Number(3.0));

        let mut lower_row = RawRow::new();
        lower_row.insert("date", Cell::from("2024-04-02"));
        lower_row.insert(DAILY_TOTAL_COLUMN, Cell::Number(4.0));

        let records = synthesize(&[day_row, lower_row]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2024-04-01");
        assert_eq!(records[1].date, "2024-04-02");
    }

    #[test]
    fn test_garbage_total_propagates_nan() {
        let mut bad = row("2024-01-02", [1.0; 8], 0.0);
        bad.insert(DAILY_TOTAL_COLUMN, Cell::from("abc"));

        let rows = vec![row("2024-01-01", [1.0; 8], 8.0), bad, row("2024-01-03", [1.0; 8], 9.0)];
        let records = synthesize(&rows);

        assert_eq!(records.len(), 3);
        assert!(records[1].close.is_nan());
        assert!(records[1].daily_total.is_nan());
        assert!(records[1].high.is_nan());
        assert!(records[1].low.is_nan());
        // L'open du jour dégradé reste le close de la veille
        assert_eq!(records[1].open, 8.0);
        // Le NaN est reporté comme open du lendemain
        assert!(records[2].open.is_nan());
        assert_eq!(records[2].close, 9.0);
    }

    #[test]
    fn test_missing_category_column_is_nan() {
        let mut row = RawRow::new();
        row.insert("Date", Cell::from("2024-01-01"));
        row.insert(DAILY_TOTAL_COLUMN, Cell::Number(10.0));

        let records = synthesize(&[row]);
        assert!(records[0].personal_well_being.is_nan());
        assert!(records[0].high.is_nan());
        assert_eq!(records[0].close, 10.0);
        assert_eq!(records[0].open, 10.0);
    }

    #[test]
    fn test_text_numbers_are_coerced() {
        let mut row = row("2024-01-01", [1.0; 8], 0.0);
        row.insert("Relationships", Cell::from("7"));
        row.insert(DAILY_TOTAL_COLUMN, Cell::from("14.5"));

        let records = synthesize(&[row]);
        assert_eq!(records[0].relationships, 7.0);
        assert_eq!(records[0].daily_total, 14.5);
        assert_eq!(records[0].high, 14.5);
    }

    #[test]
    fn test_no_sorting_and_no_state_between_calls() {
        let rows = vec![
            row("2024-01-05", [1.0; 8], 20.0),
            row("2024-01-01", [1.0; 8], 10.0),
        ];

        let first = synthesize(&rows);
        assert_eq!(first[0].date, "2024-01-05");
        assert_eq!(first[1].date, "2024-01-01");

        // Un second appel repart de zéro : pas de close hérité
        let second = synthesize(&rows[1..]);
        assert_eq!(second[0].open, 10.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(synthesize(&[]).is_empty());
    }
}
