// ============================================================================
// Candlestick Layout - Géométrie des chandeliers
// ============================================================================
// Calcule, pour chaque bougie visible, les positions verticales de la mèche
// (high -> low) et du corps (open -> close), plus les labels de mois.
// Aucune dépendance au rendu : le résultat est consommé par le rendu texte
// (candlestick_text) mais pourrait l'être par n'importe quelle surface.
//
// ALGORITHME :
// - Fenêtrage : les `window_size` dernières bougies (simple tail-slice)
// - Domaine : min des low / max des high sur la fenêtre seulement
// - Échelle : y = (max - v) / (max - min) * hauteur (orientation inversée)
// - Domaine dégénéré (max == min) : toutes les positions valent 0
// - Corps : épaisseur minimale de 2 pixels pour les jours sans mouvement
// ============================================================================

use crate::models::date::{is_first_of_month, month_abbrev, parse_calendar_date};
use crate::models::numeric::{propagating_max, propagating_min};
use crate::models::Candle;

// ============================================================================
// Constantes
// ============================================================================

/// Fenêtre par défaut (nombre de bougies affichées)
pub const DEFAULT_WINDOW: usize = 60;

/// Épaisseur minimale du corps, en pixels
pub const MIN_BODY_HEIGHT: f64 = 2.0;

/// Sens d'une bougie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// close >= open (l'égalité compte comme hausse)
    Up,
    Down,
}

/// Segment vertical : position haute + étendue, en pixels depuis le haut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalSpan {
    pub top: f64,
    pub height: f64,
}

impl VerticalSpan {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Géométrie d'une bougie visible
#[derive(Debug, Clone, PartialEq)]
pub struct CandleGeometry {
    /// Date de la bougie (telle que stockée dans l'enregistrement)
    pub date: String,
    /// Mèche high -> low
    pub wick: VerticalSpan,
    /// Corps open -> close
    pub body: VerticalSpan,
    pub direction: Direction,
    /// Mois abrégé ("Jan") ou chaîne vide
    pub label: String,
}

impl CandleGeometry {
    /// Décalage du corps par rapport au haut de la mèche
    pub fn body_offset(&self) -> f64 {
        self.body.top - self.wick.top
    }

    pub fn is_up(&self) -> bool {
        self.direction == Direction::Up
    }
}

// ============================================================================
// Échelle verticale
// ============================================================================

/// Projection valeur -> pixel pour une fenêtre donnée
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreScale {
    pub min: f64,
    pub max: f64,
    pub height: f64,
}

impl ScoreScale {
    /// Calcule le domaine [min des low, max des high] sur les bougies données
    ///
    /// CONCEPT : comparaisons strictes
    /// - `low < min` est faux pour un NaN : les valeurs NaN n'entrent
    ///   pas dans le domaine, elles ne le contaminent pas
    /// - Les infinis ("Infinity" dans le tableur) sont écartés de la même façon
    pub fn from_candles<C: Candle>(candles: &[C], height: f64) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for candle in candles {
            let (low, high) = (candle.low(), candle.high());
            if low.is_finite() && low < min {
                min = low;
            }
            if high.is_finite() && high > max {
                max = high;
            }
        }

        Self { min, max, height }
    }

    /// Domaine plat ou inexploitable (aucune valeur finie)
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min || !self.min.is_finite() || !self.max.is_finite()
    }

    /// Position verticale d'une valeur (0 = haut du graphique)
    pub fn y(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (self.max - value) / (self.max - self.min) * self.height
    }

    /// Valeur correspondant à une position verticale (pour l'axe Y)
    pub fn value_at(&self, y: f64) -> f64 {
        if self.is_degenerate() {
            return if self.max.is_finite() { self.max } else { f64::NAN };
        }
        self.max - y / self.height * (self.max - self.min)
    }
}

// ============================================================================
// Mise en page
// ============================================================================

/// Résultat complet : échelle utilisée + géométrie des bougies
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub scale: ScoreScale,
    pub candles: Vec<CandleGeometry>,
}

/// Les `window_size` dernières bougies (toutes s'il y en a moins)
pub fn visible_window<C>(records: &[C], window_size: usize) -> &[C] {
    &records[records.len().saturating_sub(window_size)..]
}

/// Calcule la géométrie des bougies visibles
///
/// # Arguments
/// * `records` - Série complète (jamais modifiée)
/// * `window_size` - Nombre maximum de bougies affichées
/// * `pixel_height` - Hauteur de la zone de dessin
pub fn layout<C: Candle>(records: &[C], window_size: usize, pixel_height: f64) -> Vec<CandleGeometry> {
    chart_layout(records, window_size, pixel_height).candles
}

/// Comme `layout`, mais retourne aussi l'échelle (utile pour dessiner l'axe Y)
pub fn chart_layout<C: Candle>(records: &[C], window_size: usize, pixel_height: f64) -> ChartLayout {
    let visible = visible_window(records, window_size);
    let scale = ScoreScale::from_candles(visible, pixel_height);

    let candles = visible
        .iter()
        .enumerate()
        .map(|(index, candle)| candle_geometry(candle, &scale, index == 0))
        .collect();

    ChartLayout { scale, candles }
}

fn candle_geometry<C: Candle>(candle: &C, scale: &ScoreScale, first: bool) -> CandleGeometry {
    let high_y = scale.y(candle.high());
    let low_y = scale.y(candle.low());
    let open_y = scale.y(candle.open());
    let close_y = scale.y(candle.close());

    // min/max propageant le NaN : un open ou close illisible donne un corps NaN
    let top = propagating_min([open_y, close_y]);
    let bottom = propagating_max([open_y, close_y]);

    let direction = if candle.close() >= candle.open() {
        Direction::Up
    } else {
        Direction::Down
    };

    CandleGeometry {
        date: candle.date().to_string(),
        wick: VerticalSpan {
            top: high_y,
            height: low_y - high_y,
        },
        body: VerticalSpan {
            top,
            height: propagating_max([MIN_BODY_HEIGHT, bottom - top]),
        },
        direction,
        label: month_label(candle.date(), first),
    }
}

/// Label de l'axe X : mois abrégé pour la première bougie et les 1ers du mois
///
/// Une date illisible ne produit jamais de label
fn month_label(date: &str, first: bool) -> String {
    match parse_calendar_date(date) {
        Some(day) if first || is_first_of_month(day) => month_abbrev(day),
        _ => String::new(),
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Bougie minimale pour les tests (le moteur est générique sur Candle)
    struct Bar {
        date: String,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    }

    impl Candle for Bar {
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

    fn bar(date: &str, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: date.to_string(),
            open,
            high,
            low,
            close,
        }
    }

    fn series(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let v = i as f64;
                bar(&format!("day-{}", i), v, v + 2.0, v - 2.0, v + 1.0)
            })
            .collect()
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let records = series(100);
        let geometry = layout(&records, 60, 300.0);

        assert_eq!(geometry.len(), 60);
        assert_eq!(geometry[0].date, "day-40");
        assert_eq!(geometry[59].date, "day-99");
    }

    #[test]
    fn test_window_larger_than_series() {
        let records = series(5);
        assert_eq!(layout(&records, 60, 300.0).len(), 5);
        assert!(layout(&records, 0, 300.0).is_empty());
        assert!(layout::<Bar>(&[], 60, 300.0).is_empty());
    }

    #[test]
    fn test_scale_uses_window_only() {
        let mut records = series(10);
        // Valeur extrême hors fenêtre : ne doit pas influencer l'échelle
        records[0].high = 1000.0;

        let chart = chart_layout(&records, 3, 100.0);
        assert_eq!(chart.scale.min, 5.0);
        assert_eq!(chart.scale.max, 11.0);
    }

    #[test]
    fn test_vertical_mapping() {
        let records = vec![bar("2024-01-10", 40.0, 50.0, 0.0, 50.0)];
        let geometry = layout(&records, 60, 100.0);
        let g = &geometry[0];

        // high en haut, low en bas
        assert_eq!(g.wick.top, 0.0);
        assert_eq!(g.wick.height, 100.0);
        assert_eq!(g.body.top, 0.0);
        assert_eq!(g.body.height, 20.0);
        assert_eq!(g.body_offset(), 0.0);
        assert!(g.is_up());
    }

    #[test]
    fn test_degenerate_scale_maps_to_zero() {
        let records = vec![
            bar("2024-01-01", 5.0, 5.0, 5.0, 5.0),
            bar("2024-01-02", 5.0, 5.0, 5.0, 5.0),
        ];

        for g in layout(&records, 60, 300.0) {
            assert_eq!(g.wick.top, 0.0);
            assert_eq!(g.wick.height, 0.0);
            assert_eq!(g.body.top, 0.0);
            assert_eq!(g.body.height, MIN_BODY_HEIGHT);
        }
    }

    #[test]
    fn test_minimum_body_extent() {
        let records = vec![
            bar("2024-01-01", 10.0, 20.0, 0.0, 10.0),
            bar("2024-01-02", 10.0, 20.0, 0.0, 10.1),
        ];

        let geometry = layout(&records, 60, 300.0);
        assert_eq!(geometry[0].body.height, 2.0);
        assert_eq!(geometry[1].body.height, 2.0);
    }

    #[test]
    fn test_direction() {
        let records = vec![
            bar("a", 10.0, 20.0, 0.0, 12.0),
            bar("b", 12.0, 20.0, 0.0, 8.0),
            bar("c", 8.0, 20.0, 0.0, 8.0),
        ];

        let geometry = layout(&records, 60, 100.0);
        assert_eq!(geometry[0].direction, Direction::Up);
        assert_eq!(geometry[1].direction, Direction::Down);
        // Égalité : hausse
        assert_eq!(geometry[2].direction, Direction::Up);
    }

    #[test]
    fn test_down_body_spans_open_to_close() {
        let records = vec![bar("a", 80.0, 100.0, 0.0, 20.0)];
        let g = &layout(&records, 60, 100.0)[0];

        assert_eq!(g.body.top, 20.0);
        assert_eq!(g.body.bottom(), 80.0);
        assert_eq!(g.body_offset(), 20.0);
    }

    #[test]
    fn test_month_labels() {
        let records = vec![
            bar("2024-01-30", 1.0, 2.0, 0.0, 1.0),
            bar("2024-01-31", 1.0, 2.0, 0.0, 1.0),
            bar("2024-02-01", 1.0, 2.0, 0.0, 1.0),
            bar("2024-02-02", 1.0, 2.0, 0.0, 1.0),
        ];

        let labels: Vec<String> = layout(&records, 60, 100.0)
            .into_iter()
            .map(|g| g.label)
            .collect();
        assert_eq!(labels, vec!["Jan", "", "Feb", ""]);
    }

    #[test]
    fn test_unparseable_dates_never_labelled() {
        let records = vec![
            bar("garbage", 1.0, 2.0, 0.0, 1.0),
            bar("also garbage", 1.0, 2.0, 0.0, 1.0),
            bar("2024-03-01", 1.0, 2.0, 0.0, 1.0),
        ];

        let labels: Vec<String> = layout(&records, 60, 100.0)
            .into_iter()
            .map(|g| g.label)
            .collect();
        assert_eq!(labels, vec!["", "", "Mar"]);
    }

    #[test]
    fn test_nan_values_stay_out_of_domain() {
        let records = vec![
            bar("a", 10.0, 20.0, 0.0, 10.0),
            bar("b", f64::NAN, f64::NAN, f64::NAN, f64::NAN),
        ];

        let chart = chart_layout(&records, 60, 100.0);
        assert_eq!(chart.scale.min, 0.0);
        assert_eq!(chart.scale.max, 20.0);

        let g = &chart.candles[1];
        assert!(g.wick.top.is_nan());
        assert!(g.body.top.is_nan());
        assert!(g.body.height.is_nan());
        // NaN >= NaN est faux : bougie baissière
        assert_eq!(g.direction, Direction::Down);
    }

    #[test]
    fn test_infinite_values_stay_out_of_domain() {
        let records = vec![
            bar("a", 10.0, 20.0, 0.0, 10.0),
            bar("b", 10.0, f64::INFINITY, f64::NEG_INFINITY, 15.0),
        ];

        let chart = chart_layout(&records, 60, 100.0);
        assert_eq!(chart.scale.min, 0.0);
        assert_eq!(chart.scale.max, 20.0);
        assert!(!chart.scale.is_degenerate());

        // La première bougie garde sa géométrie normale
        assert_eq!(chart.candles[0].wick.top, 0.0);
        assert_eq!(chart.candles[0].wick.height, 100.0);
        assert_eq!(chart.candles[1].body.top, 25.0);
        assert!(chart.candles[1].wick.top.is_infinite());
    }

    #[test]
    fn test_all_nan_window_is_degenerate() {
        let records = vec![bar("a", f64::NAN, f64::NAN, f64::NAN, f64::NAN)];
        let chart = chart_layout(&records, 60, 100.0);

        assert!(chart.scale.is_degenerate());
        assert_eq!(chart.candles[0].wick.top, 0.0);
        assert_eq!(chart.candles[0].body.height, MIN_BODY_HEIGHT);
    }

    #[test]
    fn test_value_at_inverts_y() {
        let scale = ScoreScale {
            min: 0.0,
            max: 50.0,
            height: 100.0,
        };
        assert_eq!(scale.y(25.0), 50.0);
        assert_eq!(scale.value_at(50.0), 25.0);
        assert_eq!(scale.value_at(0.0), 50.0);
    }
}
