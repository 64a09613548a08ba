//! sanvidhan-core – Gemeinsame Typen, Konstanten und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Sanvidhan-Crates gemeinsam genutzt werden: Modi, Abo-Plaene,
//! Nachrichten, Lesezeichen sowie die festen Tabellen (Sprachen,
//! System-Instruktionen, Preisplaene).

pub mod constants;
pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use constants::{pricing_plans, sprache_finden, system_instruction, PricingPlan, LANGUAGES};
pub use error::{Result, SanvidhanError};
pub use types::{Bookmark, Language, Message, MessageId, Rolle, SubscriptionPlan, UserMode};
