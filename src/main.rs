// ============================================================================
// LifeTracker - Suivi de vie en chandeliers japonais
// ============================================================================
// Programme TUI qui lit un Google Sheet de scores journaliers, en déduit une
// série OHLC et l'affiche en chandeliers avec des KPI.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : tokio::runtime::Runtime pour les appels HTTP
// 4. Worker thread + channels : le réseau ne bloque jamais l'UI
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use lifetracker::api::{fetch_records, SheetReference};
use lifetracker::app::App;
use lifetracker::models::DailyRecord;
use lifetracker::settings::SettingsStore;
use lifetracker::ui::candlestick_layout::DEFAULT_WINDOW;
use lifetracker::ui::{events::EventHandler, render};

// ============================================================================
// Ligne de commande
// ============================================================================

/// Suivi de vie quotidien : scores d'un Google Sheet en chandeliers
#[derive(Debug, Parser)]
#[command(name = "lifetracker", version, about)]
struct Cli {
    /// Lien ou identifiant du Google Sheet (prioritaire sur les réglages)
    #[arg(long, env = "LIFETRACKER_SHEET")]
    sheet: Option<String>,

    /// Affiche la série journalière en JSON puis quitte (pas de TUI)
    #[arg(long)]
    json: bool,

    /// Nombre de jours affichés dans la vue graphique
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,
}

// ============================================================================
// AppCommand / AppResult : communication avec le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker thread exécute les tâches async (fetch HTTP)
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Recharger la feuille courante
    Reload { sheet: SheetReference },

    /// Tester un nouveau lien saisi dans Settings ("Save & Test")
    TestSheet { input: String },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    RecordsLoaded { records: Vec<DailyRecord> },

    LoadError { error: String },

    /// Le nouveau lien fonctionne (et a été enregistré)
    SheetVerified {
        sheet: SheetReference,
        records: Vec<DailyRecord>,
    },

    SheetRejected { error: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers ./logs/lifetracker.log
///
/// # Utilisation
/// ```bash
/// tail -f logs/lifetracker.log
/// RUST_LOG=lifetracker=trace lifetracker
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lifetracker.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lifetracker, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifetracker=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(json = cli.json, window = cli.window, "LifeTracker starting up");

    let store = match SettingsStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = ?e, "Settings unavailable, changes won't be saved");
            None
        }
    };

    let sheet = resolve_sheet(cli.sheet.as_deref(), store.as_ref())?;
    info!(sheet = %sheet.id(), "Using sheet");

    let runtime = tokio::runtime::Runtime::new()?;

    // Mode non interactif : la série en JSON sur stdout
    if cli.json {
        let records = runtime.block_on(fetch_records(&sheet))?;
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("📊 Chargement de la feuille...\n");
    let mut app = App::new(sheet.clone());
    app.set_window_size(cli.window);

    // Une erreur au démarrage n'empêche pas d'ouvrir le TUI :
    // l'utilisateur peut corriger le lien dans Settings
    match runtime.block_on(fetch_records(&sheet)) {
        Ok(records) => {
            info!(records = records.len(), "Initial data loaded");
            app.set_records(records);
        }
        Err(e) => {
            error!(error = ?e, "Initial load failed");
            app.set_error(e.to_string());
        }
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(app));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, app.clone(), store);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app.clone(), &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Choisit la feuille : ligne de commande, puis réglages, puis feuille par défaut
///
/// Un lien invalide en ligne de commande est une erreur ; un lien invalide
/// dans les réglages est ignoré
fn resolve_sheet(cli_sheet: Option<&str>, store: Option<&SettingsStore>) -> Result<SheetReference> {
    if let Some(input) = cli_sheet {
        return SheetReference::parse(input).context("Invalid --sheet value");
    }

    if let Some(saved) = store.and_then(|s| s.sheet()) {
        match SheetReference::parse(saved) {
            Ok(sheet) => return Ok(sheet),
            Err(e) => warn!(saved = %saved, error = %e, "Ignoring invalid saved sheet"),
        }
    }

    Ok(SheetReference::default_sheet())
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Thread + async runtime
// - std::thread::spawn() : crée un thread OS
// - tokio::runtime::Runtime : runtime async dans ce thread
// - Le store de réglages est déplacé (move) dans le thread : seul le
//   worker écrit le fichier
// ============================================================================

fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
    mut store: Option<SettingsStore>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create worker runtime");
                return;
            }
        };

        // Le worker s'arrête quand l'event loop ferme le channel
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            match command {
                AppCommand::Reload { sheet } => {
                    app.lock()
                        .unwrap()
                        .start_loading(Some("Rechargement de la feuille...".to_string()));

                    let result = match runtime.block_on(fetch_records(&sheet)) {
                        Ok(records) => {
                            info!(records = records.len(), "Sheet reloaded");
                            AppResult::RecordsLoaded { records }
                        }
                        Err(e) => {
                            error!(error = ?e, "Failed to reload sheet");
                            AppResult::LoadError { error: e.to_string() }
                        }
                    };
                    let _ = result_tx.send(result);

                    app.lock().unwrap().stop_loading();
                }

                AppCommand::TestSheet { input } => {
                    app.lock()
                        .unwrap()
                        .start_loading(Some("Test de la feuille...".to_string()));

                    let result = match SheetReference::parse(&input) {
                        Ok(sheet) => match runtime.block_on(fetch_records(&sheet)) {
                            Ok(records) => {
                                info!(sheet = %sheet.id(), records = records.len(), "Sheet verified");
                                persist_sheet(store.as_mut(), &sheet);
                                AppResult::SheetVerified { sheet, records }
                            }
                            Err(e) => {
                                warn!(sheet = %sheet.id(), error = ?e, "Sheet test failed");
                                AppResult::SheetRejected { error: e.to_string() }
                            }
                        },
                        Err(e) => {
                            warn!(input = %input, error = %e, "Invalid sheet link");
                            AppResult::SheetRejected { error: e.to_string() }
                        }
                    };
                    let _ = result_tx.send(result);

                    app.lock().unwrap().stop_loading();
                }
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

/// Enregistre la feuille vérifiée ; un échec d'écriture n'annule pas le test
fn persist_sheet(store: Option<&mut SettingsStore>, sheet: &SheetReference) {
    let Some(store) = store else {
        warn!("No settings store, sheet not saved");
        return;
    };

    match store.set_sheet(sheet.to_string()) {
        Ok(()) => info!(path = %store.path().display(), "Sheet saved to settings"),
        Err(e) => error!(error = ?e, "Failed to save settings"),
    }
}

// ============================================================================
// Event Loop
// ============================================================================
// CONCEPT : Game loop pattern
// 1. Applique les résultats du worker
// 2. Render : dessine l'UI
// 3. Handle events : traite les inputs
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        if !app.lock().unwrap().is_running() {
            break;
        }

        match result_rx.try_recv() {
            Ok(result) => apply_result(&mut app.lock().unwrap(), result),
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        if let Ok(event) = events.next() {
            let mut app_lock = app.lock().unwrap();
            handle_event(&mut app_lock, event, &command_tx);
        }

        app.lock().unwrap().tick();
    }

    Ok(())
}

/// Applique un résultat du worker à l'état de l'application
fn apply_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::RecordsLoaded { records } => {
            info!(records = records.len(), "Updating records");
            app.set_records(records);
        }
        AppResult::LoadError { error } => {
            app.set_error(error);
        }
        AppResult::SheetVerified { sheet, records } => {
            info!(sheet = %sheet.id(), "Switching to verified sheet");
            app.settings_verified(sheet, records);
        }
        AppResult::SheetRejected { error } => {
            app.settings_failed(error);
        }
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================
// L'écran Settings capture le clavier : ses bras passent avant les
// raccourcis globaux pour que 'q', 's' ou 'r' puissent être tapés.
// ============================================================================

fn handle_event(app: &mut App, event: lifetracker::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lifetracker::app::SettingsStatus;
    use lifetracker::ui::events::{
        get_char_from_event, is_backspace_event, is_enter_event, is_escape_event, is_narrow_event,
        is_quit_event, is_reload_event, is_settings_event, is_text_char_event, is_widen_event, Event,
    };

    match event {
        Event::Tick => {}

        // === Settings ===
        Event::Key(_) if is_escape_event(&event) && app.is_in_settings() => {
            info!("User left settings");
            app.cancel_settings();
        }

        Event::Key(_) if is_enter_event(&event) && app.is_in_settings() => {
            if app.settings_status == SettingsStatus::Testing {
                debug!("Sheet test already running, ignoring");
            } else {
                let input = app.submit_settings();
                info!(input = %input, "User submitted sheet link");
                let _ = command_tx.send(AppCommand::TestSheet { input });
            }
        }

        Event::Key(_) if is_backspace_event(&event) && app.is_in_settings() => {
            app.backspace();
        }

        Event::Key(_) if is_text_char_event(&event) && app.is_in_settings() => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }

        Event::Key(_) if app.is_in_settings() => {}

        // === Raccourcis globaux ===
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_enter_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            info!("User opened chart view");
            app.show_chart();
        }

        Event::Key(_) if is_escape_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            debug!("User returned to dashboard");
            app.show_dashboard();
        }

        Event::Key(_) if is_settings_event(&event) => {
            app.cancel_quit();
            info!("User opened settings");
            app.open_settings();
        }

        Event::Key(_) if is_reload_event(&event) => {
            app.cancel_quit();
            info!(sheet = %app.sheet.id(), "User requested reload");
            let _ = command_tx.send(AppCommand::Reload {
                sheet: app.sheet.clone(),
            });
        }

        Event::Key(_) if is_widen_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            app.widen_window();
            debug!(window = app.window_size, "User widened chart window");
        }

        Event::Key(_) if is_narrow_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            app.narrow_window();
            debug!(window = app.window_size, "User narrowed chart window");
        }

        // Toute autre touche annule la confirmation de quit
        Event::Key(_) => {
            app.cancel_quit();
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
