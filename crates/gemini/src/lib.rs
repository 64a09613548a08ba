//! sanvidhan-gemini – Anbindung an die Gemini-API
//!
//! - `TextGenerator`: Antwort auf eine Frage zur Verfassung (Verlauf,
//!   Modus-Instruktion, Sprache, optionales PDF)
//! - `SpeechSynthesizer`: Text -> Base64-kodiertes PCM (16 Bit, Mono, 24 kHz)
//! - `GeminiClient`: HTTP-Implementierung beider Traits via reqwest

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod wire;

// Bequeme Re-Exporte
pub use api::{ChatAnfrage, SpeechSynthesizer, TextGenerator};
pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::{GeminiError, GeminiResult};
pub use prompt::{compose_prompt, FALLBACK_ANTWORT};
