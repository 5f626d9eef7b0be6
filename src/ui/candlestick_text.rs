// ============================================================================
// Candlestick Chart - Rendu texte ligne par ligne
// ============================================================================
// Dessine la géométrie calculée par candlestick_layout avec des caractères
// Unicode, intégré à ratatui. Une ligne de terminal = un "pixel" vertical.
//
// ALGORITHME :
// - Le moteur de mise en page donne mèche et corps en positions verticales
// - Pour chaque ligne, on mesure la part de la cellule couverte par le
//   corps et par la mèche
// - Seuils fractionnaires (0.25, 0.75) pour une précision demi-caractère
//
// CARACTÈRES UNICODE :
// ┃ Corps plein          │ Mèche pleine
// ╹ Demi-corps (haut)    ╻ Demi-corps (bas)
// ╿ Corps haut + mèche   ╽ Mèche + corps bas
// ╵ Demi-mèche (haut)    ╷ Demi-mèche (bas)
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::kpi::format_score;
use crate::models::DailyRecord;
use crate::ui::candlestick_layout::{chart_layout, CandleGeometry, ChartLayout, ScoreScale, VerticalSpan};

// ============================================================================
// Constantes
// ============================================================================

const UNICODE_VOID: char = ' ';
const UNICODE_BODY: char = '┃';
const UNICODE_HALF_BODY_TOP: char = '╹';
const UNICODE_HALF_BODY_BOTTOM: char = '╻';
const UNICODE_BODY_TOP_WICK_BELOW: char = '╿';
const UNICODE_WICK_ABOVE_BODY_BOTTOM: char = '╽';
const UNICODE_WICK: char = '│';
const UNICODE_HALF_WICK_TOP: char = '╵';
const UNICODE_HALF_WICK_BOTTOM: char = '╷';

/// Couleurs pour bougies haussières et baissières
const BULLISH_COLOR: Color = Color::Rgb(52, 208, 88);
const BEARISH_COLOR: Color = Color::Rgb(234, 74, 90);

/// Largeur de l'axe Y (pour les scores)
const Y_AXIS_WIDTH: u16 = 12;

/// Design réactif
/// - MIN_TERMINAL_WIDTH : largeur minimale absolue pour afficher le graphique
/// - ADAPTIVE_Y_AXIS_THRESHOLD : en dessous, on réduit la largeur de l'axe Y
const MIN_TERMINAL_WIDTH: u16 = 40;
const ADAPTIVE_Y_AXIS_THRESHOLD: u16 = 80;
const NARROW_Y_AXIS_WIDTH: u16 = 8;

/// Un label sur l'axe Y toutes les N lignes
const Y_LABEL_EVERY: u16 = 4;

// ============================================================================
// Couverture d'une cellule
// ============================================================================

/// Part d'une cellule de terminal couverte par un segment vertical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coverage {
    Empty,
    Full,
    UpperHalf,
    LowerHalf,
}

/// Mesure la couverture de la ligne `row` (intervalle [row, row + 1)) par un segment
///
/// Un segment NaN ne couvre rien : la bougie reste invisible
fn coverage(span: &VerticalSpan, row: u16) -> Coverage {
    if !span.top.is_finite() || !span.height.is_finite() {
        return Coverage::Empty;
    }

    let row_top = row as f64;
    let start = span.top.max(row_top);
    let end = span.bottom().min(row_top + 1.0);
    let covered = end - start;

    if covered >= 0.75 {
        Coverage::Full
    } else if covered > 0.25 {
        if (start + end) / 2.0 < row_top + 0.5 {
            Coverage::UpperHalf
        } else {
            Coverage::LowerHalf
        }
    } else {
        Coverage::Empty
    }
}

/// Caractère d'une bougie pour une ligne donnée
fn render_cell(geometry: &CandleGeometry, row: u16) -> char {
    let body = coverage(&geometry.body, row);
    let wick = coverage(&geometry.wick, row);

    match (body, wick) {
        (Coverage::Full, _) => UNICODE_BODY,
        (Coverage::UpperHalf, Coverage::Full | Coverage::LowerHalf) => UNICODE_BODY_TOP_WICK_BELOW,
        (Coverage::UpperHalf, _) => UNICODE_HALF_BODY_TOP,
        (Coverage::LowerHalf, Coverage::Full | Coverage::UpperHalf) => UNICODE_WICK_ABOVE_BODY_BOTTOM,
        (Coverage::LowerHalf, _) => UNICODE_HALF_BODY_BOTTOM,
        (Coverage::Empty, Coverage::Full) => UNICODE_WICK,
        (Coverage::Empty, Coverage::UpperHalf) => UNICODE_HALF_WICK_TOP,
        (Coverage::Empty, Coverage::LowerHalf) => UNICODE_HALF_WICK_BOTTOM,
        (Coverage::Empty, Coverage::Empty) => UNICODE_VOID,
    }
}

fn candle_color(geometry: &CandleGeometry) -> Color {
    if geometry.is_up() {
        BULLISH_COLOR
    } else {
        BEARISH_COLOR
    }
}

/// Colonne de chaque bougie dans la zone graphique
///
/// CONCEPT : Accumulator pattern pour éviter le drift
/// - Chaque position = index × spacing (pas position_précédente + spacing)
/// - Chandelier unique : centré dans la largeur disponible
fn candle_columns(chart_width: usize, count: usize) -> Vec<usize> {
    match count {
        0 => Vec::new(),
        1 => vec![chart_width / 2],
        _ => {
            let spacing = chart_width as f64 / count as f64;
            (0..count)
                .map(|i| ((i as f64 * spacing).round() as usize).min(chart_width.saturating_sub(1)))
                .collect()
        }
    }
}

// ============================================================================
// Structure principale
// ============================================================================

/// Renderer de chandeliers en mode texte
pub struct CandlestickRenderer<'a> {
    records: &'a [DailyRecord],
    window_size: usize,
    height: u16,
    width: u16,
    y_axis_width: u16,
}

impl<'a> CandlestickRenderer<'a> {
    /// Crée un renderer pour la zone donnée (bordures comprises)
    ///
    /// - Largeur < 80 cols : axe Y réduit à 8 caractères
    /// - Largeur >= 80 cols : axe Y normal à 12 caractères
    pub fn new(records: &'a [DailyRecord], window_size: usize, area: Rect) -> Self {
        let y_axis_width = if area.width < ADAPTIVE_Y_AXIS_THRESHOLD {
            NARROW_Y_AXIS_WIDTH
        } else {
            Y_AXIS_WIDTH
        };

        Self {
            records,
            window_size,
            // 2 bordures + 2 lignes d'axe X (ticks + labels)
            height: area.height.saturating_sub(4),
            width: area.width.saturating_sub(2 + y_axis_width),
            y_axis_width,
        }
    }

    /// Fenêtre effective : une colonne minimum par bougie
    fn effective_window(&self) -> usize {
        self.window_size.min(self.width as usize)
    }

    /// Nombre de bougies réellement affichées
    pub fn visible_count(&self) -> usize {
        self.records.len().min(self.effective_window())
    }

    /// Géométrie des bougies visibles, une ligne de terminal par pixel
    pub fn layout(&self) -> ChartLayout {
        chart_layout(self.records, self.effective_window(), self.height as f64)
    }

    /// Rend une ligne de l'axe Y avec le score
    fn render_y_axis(&self, scale: &ScoreScale, row: u16) -> String {
        let label_width = self.y_axis_width.saturating_sub(3) as usize;
        if row % Y_LABEL_EVERY == 0 {
            format!("{:>width$.1} │ ", scale.value_at(row as f64), width = label_width)
        } else {
            format!("{:>width$} │ ", "", width = label_width)
        }
    }

    /// Génère toutes les lignes du graphique (bougies + axe X)
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let chart = self.layout();
        if chart.candles.is_empty() || self.height == 0 {
            return Vec::new();
        }

        let columns = candle_columns(self.width as usize, chart.candles.len());
        let mut lines = Vec::with_capacity(self.height as usize + 2);

        for row in 0..self.height {
            let mut spans = vec![Span::styled(
                self.render_y_axis(&chart.scale, row),
                Style::default().fg(Color::Gray),
            )];

            let mut cursor = 0;
            for (geometry, &column) in chart.candles.iter().zip(&columns) {
                if column > cursor {
                    spans.push(Span::raw(" ".repeat(column - cursor)));
                }
                spans.push(Span::styled(
                    render_cell(geometry, row).to_string(),
                    Style::default().fg(candle_color(geometry)),
                ));
                cursor = column + 1;
            }

            lines.push(Line::from(spans));
        }

        lines.extend(self.render_x_axis(&chart.candles, &columns));
        lines
    }

    /// Génère les 2 lignes de l'axe X : tick marks et labels de mois
    ///
    /// Un label qui chevaucherait le précédent est omis (le tick reste)
    fn render_x_axis(&self, candles: &[CandleGeometry], columns: &[usize]) -> Vec<Line<'static>> {
        let padding = " ".repeat(self.y_axis_width as usize);
        let mut ticks = String::new();
        let mut labels = String::new();
        let mut tick_len = 0;
        let mut label_len = 0;

        for (geometry, &column) in candles.iter().zip(columns) {
            if geometry.label.is_empty() {
                continue;
            }

            ticks.push_str(&" ".repeat(column.saturating_sub(tick_len)));
            ticks.push('│');
            tick_len = column + 1;

            if label_len == 0 || column > label_len {
                labels.push_str(&" ".repeat(column.saturating_sub(label_len)));
                labels.push_str(&geometry.label);
                label_len = column.max(label_len) + geometry.label.chars().count();
            }
        }

        let style = Style::default().fg(Color::Gray);
        vec![
            Line::from(vec![Span::raw(padding.clone()), Span::styled(ticks, style)]),
            Line::from(vec![Span::raw(padding), Span::styled(labels, style)]),
        ]
    }
}

// ============================================================================
// Fonctions de rendu
// ============================================================================

/// Dessine un graphique en chandeliers des totaux journaliers
pub fn render_candlestick_chart(
    frame: &mut Frame,
    records: &[DailyRecord],
    window_size: usize,
    area: Rect,
    title: &str,
) {
    if records.is_empty() {
        render_no_data(frame, area, "Pas de données à afficher");
        return;
    }

    // Graceful degradation pour terminaux étroits
    if area.width < MIN_TERMINAL_WIDTH {
        render_too_narrow(frame, area);
        return;
    }

    let renderer = CandlestickRenderer::new(records, window_size, area);
    let lines = renderer.render_lines();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(
                " 🕯️ {} ({} / {} jours) ",
                title,
                renderer.visible_count(),
                records.len()
            )),
    );

    frame.render_widget(paragraph, area);
}

/// Vue graphique plein écran : header + graphique
pub fn render_chart_view(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area)
        .to_vec();

    render_header(frame, app, chunks[0]);
    render_candlestick_chart(
        frame,
        &app.records,
        app.window_size,
        chunks[1],
        "Daily Total Candlestick [+/-: fenêtre]",
    );
}

/// Dessine le header avec le dernier jour et les raccourcis
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 🕯️ LifeTracker - Vue graphique ");

    let text = if app.is_awaiting_quit_confirmation() {
        vec![Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])]
    } else if app.is_loading_data() {
        let message = app
            .loading_message
            .clone()
            .unwrap_or_else(|| "Chargement en cours...".to_string());
        vec![Line::from(vec![
            Span::styled("⏳ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(message, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ])]
    } else if let Some(last) = app.records.last() {
        let change = last.close - last.open;
        let color = if last.is_up() { Color::Green } else { Color::Red };
        let arrow = if last.is_up() { "▲" } else { "▼" };

        vec![Line::from(vec![
            Span::raw(format!("{}  Total: ", last.date)),
            Span::styled(
                format_score(last.daily_total),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("{} {:+}", arrow, change), Style::default().fg(color)),
            Span::raw("  "),
            Span::styled("[ESC]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Retour  "),
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quitter"),
        ])]
    } else {
        vec![Line::from("Chargement...")]
    };

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Helpers : messages
// ============================================================================

/// Affiche un message quand il n'y a pas de données
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled("[r] Recharger", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Affiche un message quand le terminal est trop étroit
fn render_too_narrow(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ⚠ Terminal trop petit ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Largeur minimale requise : {} colonnes", MIN_TERMINAL_WIDTH),
            Style::default().fg(Color::Yellow),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================
