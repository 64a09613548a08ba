//! Trait-Schnittstellen der Remote-Dienste
//!
//! Die Sitzung kennt nur diese Traits, so lassen sich Chat und
//! Sprachsynthese in Tests durch Attrappen ersetzen.

use async_trait::async_trait;
use sanvidhan_core::{Message, UserMode};

use crate::error::GeminiResult;

/// Eingaben fuer eine Chat-Antwort
#[derive(Debug, Clone, Copy)]
pub struct ChatAnfrage<'a> {
    /// Bisheriger Verlauf, die letzte Nachricht ist die aktuelle Frage
    pub verlauf: &'a [Message],
    pub mode: UserMode,
    /// Sprach-Code (z.B. "hi")
    pub language: &'a str,
    /// Base64-kodiertes Verfassungs-PDF als Quelle
    pub pdf_base64: Option<&'a str>,
}

/// Erzeugt Textantworten
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, anfrage: ChatAnfrage<'_>) -> GeminiResult<String>;
}

/// Erzeugt Sprachausgabe als Base64-kodiertes PCM.
///
/// `Ok(None)` bedeutet: Synthese lieferte keine Audiodaten.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> GeminiResult<Option<String>>;
}
