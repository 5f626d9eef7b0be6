// ============================================================================
// Structure : RawRow (ligne brute du tableur)
// ============================================================================
// Une ligne telle qu'elle sort de l'export CSV : un mapping
// "nom de colonne" -> cellule (texte ou nombre).
//
// CONCEPTS RUST :
// 1. Enum avec données : Cell::Text(String) / Cell::Number(f64)
// 2. HashMap<String, Cell> : lookup par libellé de colonne
// 3. FromIterator : construire une RawRow avec .collect()
// ============================================================================

use std::collections::HashMap;

use super::numeric::parse_float;

// ============================================================================
// Libellés de colonnes attendus
// ============================================================================

/// Alias possibles de la colonne date, par ordre de préférence
pub const DATE_ALIASES: [&str; 3] = ["Date", "date", "DAY"];

/// Colonne du total journalier (valeur de référence, jamais recalculée)
pub const DAILY_TOTAL_COLUMN: &str = "Daily Total";

/// Une cellule du tableur
///
/// CONCEPT : Typage dynamique du CSV
/// - Un champ entièrement numérique devient Number
/// - Tout le reste reste Text, verbatim
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    /// Convertit un champ CSV brut en cellule
    ///
    /// Retourne None pour un champ vide (cellule absente)
    pub fn from_csv_field(field: &str) -> Option<Cell> {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return None;
        }

        if looks_numeric(trimmed) {
            if let Ok(value) = trimmed.parse::<f64>() {
                return Some(Cell::Number(value));
            }
        }

        Some(Cell::Text(field.to_string()))
    }

    /// Représentation texte de la cellule
    ///
    /// Les nombres utilisent l'affichage le plus court (45000, 1.5)
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => value.to_string(),
        }
    }

    /// Coercition numérique : les nombres passent, le texte est parsé
    ///
    /// Un texte illisible donne NaN (pas d'erreur)
    pub fn to_number(&self) -> f64 {
        match self {
            Cell::Number(value) => *value,
            Cell::Text(text) => parse_float(text),
        }
    }

    /// Vrai si la cellule ne porte aucune valeur exploitable
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Vrai si le champ est un nombre décimal complet (signe '-' optionnel)
fn looks_numeric(field: &str) -> bool {
    let body = field.strip_prefix('-').unwrap_or(field);
    !body.is_empty()
        && body.bytes().any(|b| b.is_ascii_digit())
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && body.as_bytes()[0] != b'+'
}

/// Une ligne brute du tableur
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, Cell>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, cell: Cell) {
        self.cells.insert(label.into(), cell);
    }

    pub fn get(&self, label: &str) -> Option<&Cell> {
        self.cells.get(label)
    }

    /// Premier alias présent et non vide, dans l'ordre donné
    ///
    /// CONCEPT RUST : find_map
    /// - Essaie chaque clé candidate en séquence
    /// - S'arrête au premier Some
    pub fn first_present(&self, aliases: &[&str]) -> Option<&Cell> {
        aliases
            .iter()
            .find_map(|label| self.get(label).filter(|cell| !cell.is_blank()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, Cell)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
