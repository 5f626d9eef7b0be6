// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Encapsulation : les modifications passent par les méthodes
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Les enregistrements sont remplacés en bloc à chaque chargement
//   (pas de cache, pas d'historique)
// ============================================================================

use crate::api::sheets::SheetReference;
use crate::models::{DailyRecord, Kpis};
use crate::ui::candlestick_layout::DEFAULT_WINDOW;

/// Bornes de la fenêtre de la vue graphique
pub const MIN_WINDOW: usize = 10;
pub const MAX_WINDOW: usize = 365;

/// Pas d'ajustement de la fenêtre avec + / -
pub const WINDOW_STEP: usize = 10;

/// Fenêtre du graphique du dashboard
pub const DASHBOARD_WINDOW: usize = 90;

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : KPI, graphique, dernières entrées
    Dashboard,

    /// Vue graphique plein écran
    ChartView,

    /// Réglages : saisie du lien Google Sheets
    Settings,
}

/// État du test de connexion dans l'écran Settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsStatus {
    Idle,
    Testing,
    Connected,
    Failed(String),
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Série journalière courante (recalculée à chaque chargement)
    pub records: Vec<DailyRecord>,

    /// Feuille actuellement utilisée
    pub sheet: SheetReference,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Nombre de bougies de la vue graphique (ajustable avec + et -)
    pub window_size: usize,

    /// Two-step quit : première pression de 'q' = confirmation
    pub confirm_quit: bool,

    /// Indique si des données sont en cours de chargement
    pub is_loading: bool,

    /// Message de chargement optionnel
    pub loading_message: Option<String>,

    /// Dernière erreur de chargement (None si le dernier chargement a réussi)
    pub error: Option<String>,

    /// Buffer de saisie de l'écran Settings
    pub input_buffer: String,

    /// Résultat du dernier "Save & Test"
    pub settings_status: SettingsStatus,
}

impl App {
    /// Crée une App sans données pour la feuille donnée
    pub fn new(sheet: SheetReference) -> Self {
        Self {
            running: true,
            records: Vec::new(),
            sheet,
            current_screen: Screen::Dashboard,
            window_size: DEFAULT_WINDOW,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            error: None,
            input_buffer: String::new(),
            settings_status: SettingsStatus::Idle,
        }
    }

    /// Crée une App avec des enregistrements préchargés
    pub fn with_records(sheet: SheetReference, records: Vec<DailyRecord>) -> Self {
        Self {
            records,
            ..Self::new(sheet)
        }
    }

    /// Fixe la fenêtre de la vue graphique (bornée à MIN_WINDOW..=MAX_WINDOW)
    pub fn set_window_size(&mut self, window_size: usize) {
        self.window_size = window_size.clamp(MIN_WINDOW, MAX_WINDOW);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) {}

    // ========================================================================
    // Données
    // ========================================================================

    /// Remplace la série courante (chargement réussi)
    pub fn set_records(&mut self, records: Vec<DailyRecord>) {
        self.records = records;
        self.error = None;
    }

    /// Enregistre une erreur de chargement ; la série précédente est gardée
    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }

    /// KPI de la série courante
    pub fn kpis(&self) -> Option<Kpis> {
        Kpis::compute(&self.records)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn show_chart(&mut self) {
        self.current_screen = Screen::ChartView;
    }

    pub fn show_dashboard(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_on_chart(&self) -> bool {
        self.current_screen == Screen::ChartView
    }

    /// Élargit la fenêtre de la vue graphique
    pub fn widen_window(&mut self) {
        self.set_window_size(self.window_size + WINDOW_STEP);
    }

    /// Réduit la fenêtre de la vue graphique
    pub fn narrow_window(&mut self) {
        self.set_window_size(self.window_size.saturating_sub(WINDOW_STEP));
    }

    // ========================================================================
    // Quit / chargement
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Ouvre l'écran Settings, pré-rempli avec la feuille courante
    pub fn open_settings(&mut self) {
        self.current_screen = Screen::Settings;
        self.input_buffer = self.sheet.to_string();
        self.settings_status = SettingsStatus::Idle;
    }

    /// Annule la saisie et retourne au dashboard
    pub fn cancel_settings(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.settings_status = SettingsStatus::Idle;
    }

    /// Valide la saisie : passe en test et retourne le texte saisi
    ///
    /// On reste sur l'écran Settings jusqu'au résultat du test
    pub fn submit_settings(&mut self) -> String {
        self.settings_status = SettingsStatus::Testing;
        self.input_buffer.trim().to_string()
    }

    /// Le test a réussi : la nouvelle feuille et ses données sont adoptées
    pub fn settings_verified(&mut self, sheet: SheetReference, records: Vec<DailyRecord>) {
        self.sheet = sheet;
        self.set_records(records);
        self.settings_status = SettingsStatus::Connected;
    }

    /// Le test a échoué : l'ancienne feuille reste en place
    pub fn settings_failed(&mut self, error: String) {
        self.settings_status = SettingsStatus::Failed(error);
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_settings(&self) -> bool {
        self.current_screen == Screen::Settings
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total: f64) -> DailyRecord {
        DailyRecord {
            date: "2024-01-01".to_string(),
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
    fn test_app_creation() {
        let app = App::new(SheetReference::default_sheet());
        assert!(app.is_running());
        assert!(app.records.is_empty());
        assert!(app.is_on_dashboard());
        assert_eq!(app.window_size, DEFAULT_WINDOW);
        assert!(app.kpis().is_none());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new(SheetReference::default_sheet());
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_window_bounds() {
        let mut app = App::new(SheetReference::default_sheet());
        app.set_window_size(MIN_WINDOW);
        app.narrow_window();
        assert_eq!(app.window_size, MIN_WINDOW);

        app.set_window_size(MAX_WINDOW);
        app.widen_window();
        assert_eq!(app.window_size, MAX_WINDOW);

        app.set_window_size(60);
        app.widen_window();
        assert_eq!(app.window_size, 70);
    }

    #[test]
    fn test_error_keeps_previous_records() {
        let mut app = App::with_records(SheetReference::default_sheet(), vec![record(10.0)]);
        app.set_error("HTTP 404".to_string());
        assert_eq!(app.records.len(), 1);
        assert!(app.error.is_some());

        app.set_records(vec![record(1.0), record(2.0)]);
        assert!(app.error.is_none());
        assert_eq!(app.kpis().unwrap().today, 2.0);
    }

    #[test]
    fn test_settings_flow_success() {
        let mut app = App::new(SheetReference::default_sheet());
        app.open_settings();
        assert!(app.is_in_settings());
        assert_eq!(app.input_buffer, SheetReference::default_sheet().to_string());

        app.input_buffer.clear();
        for c in " abc123 ".chars() {
            app.append_char(c);
        }
        assert_eq!(app.submit_settings(), "abc123");
        assert_eq!(app.settings_status, SettingsStatus::Testing);

        let sheet = SheetReference::parse("abc123").unwrap();
        app.settings_verified(sheet.clone(), vec![record(5.0)]);
        assert_eq!(app.sheet, sheet);
        assert_eq!(app.settings_status, SettingsStatus::Connected);
        assert_eq!(app.records.len(), 1);
    }

    #[test]
    fn test_settings_flow_failure_keeps_sheet() {
        let mut app = App::new(SheetReference::default_sheet());
        app.open_settings();
        app.backspace();
        app.submit_settings();
        app.settings_failed("HTTP 403".to_string());

        assert_eq!(app.sheet, SheetReference::default_sheet());
        assert_eq!(app.settings_status, SettingsStatus::Failed("HTTP 403".to_string()));

        app.cancel_settings();
        assert!(app.is_on_dashboard());
        assert!(app.input_buffer.is_empty());
    }
}
