// ============================================================================
// Coercion numérique et extrema tolérants au NaN
// ============================================================================
// Les cellules du tableur sont "garbage in, garbage through" : une valeur
// illisible devient NaN et se propage dans les calculs au lieu de faire
// échouer la ligne.
//
// CONCEPTS RUST :
// 1. f64::NAN comme sentinelle explicite
// 2. f64::max / f64::min IGNORENT le NaN : on définit nos propres folds
// 3. Parsing manuel sur &[u8] pour trouver le plus long préfixe numérique
// ============================================================================

/// Parse le plus long préfixe numérique d'un texte
///
/// Règles :
/// - espaces en tête ignorés
/// - signe optionnel, chiffres, partie décimale, exposant optionnel
/// - "Infinity" accepté (avec signe)
/// - aucun chiffre en tête : NaN
///
/// # Exemple
/// assert_eq!(parse_float("12abc"), 12.0);
/// assert!(parse_float("abc").is_nan());
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if end < len && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // Partie entière
    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    // Partie décimale
    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        end = j;
    }

    if digits == 0 {
        return f64::NAN;
    }

    // Exposant : pris uniquement s'il contient au moins un chiffre
    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    // Tous les octets consommés sont ASCII : la coupure tombe sur une frontière de char
    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Maximum qui propage le NaN
///
/// CONCEPT RUST : fold avec accumulateur
/// - Dès qu'une valeur est NaN, le résultat reste NaN
/// - Entrée vide : -∞ (élément neutre du max)
pub fn propagating_max<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(f64::NEG_INFINITY, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.max(v)
        }
    })
}

/// Minimum qui propage le NaN (entrée vide : +∞)
pub fn propagating_min<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(f64::INFINITY, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.min(v)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_plain_numbers() {
        assert_eq!(parse_float("42"), 42.0);
        assert_eq!(parse_float("-3.5"), -3.5);
        assert_eq!(parse_float("  7"), 7.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_float_takes_numeric_prefix() {
        assert_eq!(parse_float("12abc"), 12.0);
        assert_eq!(parse_float("1,234"), 1.0);
        assert_eq!(parse_float("5e"), 5.0);
        assert_eq!(parse_float("3.25 pts"), 3.25);
    }

    #[test]
    fn test_parse_float_garbage_is_nan() {
        assert!(parse_float("abc").is_nan());
        assert!(parse_float("").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("é5").is_nan());
    }

    #[test]
    fn test_parse_float_infinity() {
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_propagating_extrema() {
        assert_eq!(propagating_max([1.0, 5.0, -2.0]), 5.0);
        assert_eq!(propagating_min([1.0, 5.0, -2.0]), -2.0);
    }

    #[test]
    fn test_propagating_extrema_with_nan() {
        // f64::max ignorerait le NaN, ici il doit gagner
        assert!(propagating_max([1.0, f64::NAN, 3.0]).is_nan());
        assert!(propagating_min([f64::NAN, 1.0]).is_nan());
    }

    #[test]
    fn test_propagating_extrema_empty() {
        assert_eq!(propagating_max(Vec::<f64>::new()), f64::NEG_INFINITY);
        assert_eq!(propagating_min(Vec::<f64>::new()), f64::INFINITY);
    }
}
