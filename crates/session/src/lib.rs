//! sanvidhan-session – Sitzungszustand und Ablaeufe
//!
//! Dieses Crate implementiert:
//! - SessionService: Fragen stellen, Artikel nachschlagen, PDF anhaengen,
//!   Lesezeichen, Modus/Sprache/Design, simulierte Zahlung
//! - VoiceService: Sprachausgabe ueber TTS und die Audio-Pipeline
//! - Tageskontingent fuer den Free-Plan

pub mod config;
pub mod error;
pub mod pdf;
pub mod quota;
pub mod service;
pub mod state;
pub mod voice;


// Bequeme Re-Exporte
pub use config::SitzungConfig;
pub use error::{SessionError, SessionResult};
pub use service::{Antwort, SessionService};
pub use state::{PdfAnhang, SessionState, BEGRUESSUNG, VERBINDUNGSFEHLER};
pub use voice::{Sprachausgabe, VoiceService};
