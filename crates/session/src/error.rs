//! Fehlertypen fuer das Sitzungs-Crate

use sanvidhan_audio::AudioError;
use sanvidhan_core::{SanvidhanError, SubscriptionPlan};
use sanvidhan_gemini::GeminiError;
use thiserror::Error;

/// Sitzungs-Fehlertypen
#[derive(Debug, Error)]
pub enum SessionError {
    /// Funktion nur mit bezahltem Abo (die Oberflaeche zeigt die Preise)
    #[error("Funktion erfordert ein bezahltes Abo (aktuell: {0})")]
    PlanErforderlich(&'static str),

    #[error("Tageskontingent erschoepft: {gestellt} von {max} Fragen gestellt")]
    KontingentErschoepft { gestellt: u32, max: u32 },

    #[error("Plan kann nicht gekauft werden: {0:?}")]
    NichtKaeuflich(SubscriptionPlan),

    #[error("Nachricht nicht gefunden: {0}")]
    NachrichtNichtGefunden(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Audio-Fehler: {0}")]
    Audio(#[from] AudioError),

    #[error("Gemini-Fehler: {0}")]
    Gemini(#[from] GeminiError),

    #[error(transparent)]
    Domain(#[from] SanvidhanError),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialisierungsfehler: {0}")]
    Serialisierung(#[from] serde_json::Error),

    #[error("Unerwarteter Fehler: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl SessionError {
    /// Gibt true zurueck wenn die Oberflaeche die Preistabelle zeigen soll
    pub fn zeigt_preise(&self) -> bool {
        matches!(self, Self::PlanErforderlich(_) | Self::KontingentErschoepft { .. })
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
