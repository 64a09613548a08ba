//! Fehlertypen fuer die Gemini-Anbindung

use thiserror::Error;

/// Fehler bei der Kommunikation mit dem Remote-Dienst
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Netzwerkfehler: {0}")]
    Netzwerk(#[from] reqwest::Error),

    #[error("API-Fehler {status}: {nachricht}")]
    Api { status: u16, nachricht: String },

    #[error("Ungueltige Antwort: {0}")]
    UngueltigeAntwort(String),

    #[error("Kein API-Schluessel gesetzt (GEMINI_API_KEY oder API_KEY)")]
    KeinApiSchluessel,

    #[error("Verlauf enthaelt keine Benutzerfrage")]
    KeineFrage,
}

impl GeminiError {
    /// Gibt true zurueck wenn das Kontingent erschoepft ist (HTTP 429)
    pub fn ist_kontingent(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }
}

pub type GeminiResult<T> = Result<T, GeminiError>;
