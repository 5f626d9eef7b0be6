// ============================================================================
// Settings : réglages persistés
// ============================================================================
// Garde la référence du Google Sheet choisie par l'utilisateur entre deux
// lancements. Fichier JSON dans le répertoire de configuration :
// - Linux : ~/.config/lifetracker/settings.json
// - macOS : ~/Library/Application Support/lifetracker/settings.json
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "lifetracker";

/// Contenu du fichier de réglages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Lien ou identifiant du Google Sheet (None : feuille par défaut)
    #[serde(default)]
    pub sheet: Option<String>,
}

/// Accès aux réglages, avec écriture immédiate à chaque modification
pub struct SettingsStore {
    path: PathBuf,
    data: UserSettings,
}

impl SettingsStore {
    /// Chemin par défaut du fichier (répertoire courant si pas de config_dir)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(SETTINGS_FILE)
    }

    /// Ouvre le fichier de réglages
    ///
    /// Fichier absent ou corrompu : réglages par défaut (pas d'erreur)
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Corrupt settings file, using defaults");
                UserSettings::default()
            })
        } else {
            debug!(path = %path.display(), "No settings file yet");
            UserSettings::default()
        };

        Ok(Self { path, data })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Référence de feuille enregistrée
    pub fn sheet(&self) -> Option<&str> {
        self.data.sheet.as_deref()
    }

    /// Enregistre une nouvelle référence de feuille
    pub fn set_sheet(&mut self, sheet: impl Into<String>) -> Result<()> {
        self.data.sheet = Some(sheet.into());
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let serialized = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}
