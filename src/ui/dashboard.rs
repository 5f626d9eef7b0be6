// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// ÉCRANS :
// 1. Dashboard : KPI, graphique des 90 derniers jours, dernières entrées
// 2. ChartView : graphique plein écran (délégué à candlestick_text)
// 3. Settings : saisie du lien Google Sheets + test de connexion
//
// CONCEPTS RATATUI :
// 1. Layout : découpage de l'espace en zones
// 2. Table : lignes + largeurs de colonnes + en-tête
// 3. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Screen, SettingsStatus, DASHBOARD_WINDOW};
use crate::models::kpi::{format_score, recent_entries, RECENT_ENTRIES};
use crate::models::Category;
use crate::ui::candlestick_text;

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Pattern matching sur app.current_screen
/// - Le compilateur garantit l'exhaustivité (tous les cas gérés)
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    match app.current_screen {
        Screen::Dashboard => render_dashboard(frame, app),
        Screen::ChartView => candlestick_text::render_chart_view(frame, app, area),
        Screen::Settings => render_settings(frame, app),
    }
}

/// Dessine le dashboard : header, KPI, graphique, tableau, footer
fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Header
            Constraint::Length(4),      // KPI
            Constraint::Percentage(50), // Graphique
            Constraint::Min(0),         // Dernières entrées
            Constraint::Length(3),      // Footer
        ])
        .split(frame.size())
        .to_vec();

    render_header(frame, app, chunks[0]);

    // Erreur sans aucune donnée : on remplace le contenu par l'aide
    if app.records.is_empty() {
        if let Some(error) = &app.error {
            let content = Rect {
                height: chunks[1].height + chunks[2].height + chunks[3].height,
                ..chunks[1]
            };
            render_error(frame, error, content);
            render_footer(frame, app, chunks[4]);
            return;
        }
    }

    render_kpis(frame, app, chunks[1]);
    candlestick_text::render_candlestick_chart(
        frame,
        &app.records,
        DASHBOARD_WINDOW,
        chunks[2],
        "Daily Total",
    );
    render_recent_entries(frame, app, chunks[3]);
    render_footer(frame, app, chunks[4]);
}

// ============================================================================
// Header
// ============================================================================

/// Dessine le header avec le titre, la feuille et l'état de chargement
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LifeTracker ")
        .title_alignment(Alignment::Center);

    let status = if app.is_loading_data() {
        let message = app
            .loading_message
            .clone()
            .unwrap_or_else(|| "Chargement en cours...".to_string());
        Span::styled(format!("⏳ {}", message), Style::default().fg(Color::Cyan))
    } else if let Some(error) = &app.error {
        Span::styled(format!("⚠ {}", error), Style::default().fg(Color::Red))
    } else {
        Span::styled(
            format!("{} jours", app.records.len()),
            Style::default().fg(Color::Green),
        )
    };

    let line = Line::from(vec![
        Span::styled(
            "📈 Sheet ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.sheet.id().to_string(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        status,
    ]);

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// KPI
// ============================================================================

/// Dessine les 4 cartes KPI côte à côte
fn render_kpis(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area)
        .to_vec();

    let cards = match app.kpis() {
        Some(kpis) => kpis.cards(),
        None => [
            ("Today's Score", "-".to_string()),
            ("7-Day Avg", "-".to_string()),
            ("Best Day", "-".to_string()),
            ("Worst Day", "-".to_string()),
        ],
    };

    for ((title, value), column) in cards.into_iter().zip(columns) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", title));

        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )))
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, column);
    }
}

// ============================================================================
// Dernières entrées
// ============================================================================

/// Dessine le tableau des dernières entrées (plus récente en haut)
///
/// CONCEPT RATATUI : Table
/// - Row : une ligne composée de Cells
/// - widths : une contrainte par colonne
fn render_recent_entries(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📋 Recent Entries ");

    let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let header = Row::new(
        std::iter::once("Date")
            .chain(Category::ALL.iter().map(|category| category.short_label()))
            .chain(std::iter::once("Total"))
            .map(|title| Cell::from(title).style(header_style)),
    );

    let rows: Vec<Row> = recent_entries(&app.records, RECENT_ENTRIES)
        .into_iter()
        .map(|record| {
            let total_color = if record.is_up() { Color::Green } else { Color::Red };

            let mut cells = vec![Cell::from(record.date.clone())];
            cells.extend(
                Category::ALL
                    .iter()
                    .map(|&category| Cell::from(format_score(record.score(category)))),
            );
            cells.push(
                Cell::from(format_score(record.daily_total))
                    .style(Style::default().fg(total_color).add_modifier(Modifier::BOLD)),
            );
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(12)];
    widths.extend(std::iter::repeat(Constraint::Length(13)).take(Category::ALL.len()));
    widths.push(Constraint::Length(7));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

// ============================================================================
// Erreur de chargement
// ============================================================================

/// Affiche l'erreur de chargement et l'astuce de partage
fn render_error(frame: &mut Frame, error: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Tip: In Settings, paste your Google Sheet link. \
             Make sure it's shared as \"Anyone with the link → Viewer\".",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[s]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Settings  "),
            Span::styled("[r]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Retry"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

/// Dessine le footer avec les raccourcis clavier
///
/// CONCEPT : Confirmation de quit two-step
/// - Si app.is_awaiting_quit_confirmation(), affiche un avertissement
/// - Sinon, affiche les raccourcis normaux
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
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
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Chart  "),
            Span::styled("[r]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Reload  "),
            Span::styled("[s]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Settings"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Settings : saisie du lien Google Sheets
// ============================================================================

/// Dessine l'écran Settings
///
/// CONCEPT : Modal input
/// - ESC annule, Enter sauvegarde et teste la connexion
/// - On reste sur l'écran jusqu'au résultat du test
fn render_settings(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Saisie
            Constraint::Min(0),    // Statut
            Constraint::Length(3), // Aide
        ])
        .split(frame.size())
        .to_vec();

    render_header(frame, app, chunks[0]);

    let input = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" ⚙ Google Sheet link or ID ");

    let input_line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK)),
    ]);
    let hint = Line::from(Span::styled(
        "Share the sheet as \"Anyone with the link → Viewer\"",
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(vec![input_line, Line::from(""), hint])
        .block(input)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, chunks[1]);

    let status = match &app.settings_status {
        SettingsStatus::Idle => Line::from(""),
        SettingsStatus::Testing => Line::from(Span::styled(
            "⏳ Testing…",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        SettingsStatus::Connected => Line::from(Span::styled(
            format!("✓ Connected! {} jours chargés", app.records.len()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        SettingsStatus::Failed(error) => Line::from(vec![
            Span::styled(
                "✗ Couldn't read the sheet. Check sharing & URL. ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("({})", error), Style::default().fg(Color::Gray)),
        ]),
    };

    let status = Paragraph::new(vec![status])
        .block(Block::default().borders(Borders::ALL).title(" Statut "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[2]);

    let help = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" Save & Test  "),
        Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" Cancel"),
    ]);
    let help = Paragraph::new(vec![help])
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}
