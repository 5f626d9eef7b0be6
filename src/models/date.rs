// ============================================================================
// Dates du tableur
// ============================================================================
// Les dates saisies à la main dans un Google Sheet arrivent sous des formes
// variées ("2024-01-05", "1/5/2024", "Jan 5, 2024", horodatage...).
// On essaie une liste fixe de formats ; si aucun ne passe, le texte est
// gardé tel quel (fallback, pas une erreur).
// ============================================================================

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Formats de date pure, essayés dans l'ordre
///
/// `%Y` de chrono accepte aussi 1 ou 2 chiffres : "1/5/24" passerait en
/// l'an 1 via "%Y/%m/%d". Les résultats avant MIN_YEAR sont donc écartés
/// et les formats `%y` (année sur 2 chiffres) prennent le relais.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Formats d'horodatage (export Google Sheets, saisie ISO sans fuseau)
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
];

/// Plus petite année acceptée (une année sur 4 chiffres)
const MIN_YEAR: i32 = 1000;

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    (date.year() >= MIN_YEAR).then_some(date)
}

/// Essaie d'interpréter un texte comme une date calendaire
///
/// CONCEPT RUST : Iterator::find_map
/// - Essaie chaque format et s'arrête au premier succès
/// - Retourne None si aucun format ne correspond
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok().and_then(plausible))
    {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return plausible(datetime.date_naive());
    }

    DATETIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(text, fmt)
            .ok()
            .and_then(|datetime| plausible(datetime.date()))
    })
}

/// Normalise une date en ISO `YYYY-MM-DD`, ou garde le texte verbatim
pub fn normalize_date(text: &str) -> String {
    match parse_calendar_date(text) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => text.to_string(),
    }
}

/// Nom de mois abrégé (Jan, Feb, ...)
pub fn month_abbrev(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

/// Vrai si la date tombe le premier jour de son mois
pub fn is_first_of_month(date: NaiveDate) -> bool {
    date.day() == 1
}
