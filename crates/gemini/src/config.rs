//! Konfiguration der Gemini-Anbindung
//!
//! Wird als Abschnitt `[gemini]` aus der TOML-Konfiguration geladen. Der
//! API-Schluessel steht nie in der Datei, er kommt aus der Umgebung.

use serde::{Deserialize, Serialize};

/// Einstellungen fuer Chat- und TTS-Aufrufe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Basis-URL der REST-API (ohne abschliessenden Slash)
    pub api_basis_url: String,
    /// Modell fuer Chat-Antworten
    pub chat_modell: String,
    /// Modell fuer die Sprachsynthese
    pub tts_modell: String,
    /// Vorgefertigte Stimme fuer die Sprachsynthese
    pub stimme: String,
    pub temperatur: f32,
    pub top_p: f32,
    pub top_k: u32,
    /// HTTP-Timeout pro Anfrage in Sekunden
    pub timeout_sekunden: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_basis_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            chat_modell: "gemini-3-flash-preview".into(),
            tts_modell: "gemini-2.5-flash-preview-tts".into(),
            stimme: "Kore".into(),
            temperatur: 0.1,
            top_p: 0.95,
            top_k: 64,
            timeout_sekunden: 60,
        }
    }
}

/// Liest den API-Schluessel aus `GEMINI_API_KEY`, ersatzweise `API_KEY`
pub fn api_schluessel_aus_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|wert| !wert.trim().is_empty())
}
