//! Fehlertypen fuer die Audio-Pipeline

use thiserror::Error;

/// Alle moeglichen Fehler der Audio-Pipeline
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Base64-Dekodierung fehlgeschlagen: {0}")]
    Dekodierung(#[from] base64::DecodeError),

    #[error("Audio-Ausgabe nicht verfuegbar: {0}")]
    NichtVerfuegbar(String),

    #[error("Audio-Geraet nicht gefunden: {0}")]
    GeraetNichtGefunden(String),

    #[error("Kein Standard-Ausgabegeraet verfuegbar")]
    KeinStandardAusgabegeraet,

    #[error("Es laeuft bereits eine Wiedergabe")]
    WiedergabeAktiv,

    #[error("Stream-Fehler: {0}")]
    StreamFehler(String),

    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Unerwarteter Fehler: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AudioError {
    /// Gibt true zurueck wenn die Sprachausgabe in dieser Sitzung
    /// grundsaetzlich nicht moeglich ist (kein Geraet, Host verweigert)
    pub fn ist_geraetefehler(&self) -> bool {
        matches!(
            self,
            Self::NichtVerfuegbar(_) | Self::GeraetNichtGefunden(_) | Self::KeinStandardAusgabegeraet
        )
    }
}

pub type AudioResult<T> = Result<T, AudioError>;
