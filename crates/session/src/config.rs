//! Abschnitt `[sitzung]` der Konfiguration

use sanvidhan_core::UserMode;
use serde::{Deserialize, Serialize};

/// Startwerte und Grenzen einer Sitzung
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitzungConfig {
    /// Sprachcode beim Start
    pub sprache: String,
    pub modus: UserMode,
    pub dunkelmodus: bool,
    /// Dauer der simulierten Zahlung in Millisekunden
    pub zahlung_verzoegerung_ms: u64,
    /// Fragen pro Kalendertag im Free-Plan (0 = unbegrenzt)
    pub fragen_pro_tag_free: u32,
}

impl Default for SitzungConfig {
    fn default() -> Self {
        Self {
            sprache: "en".into(),
            modus: UserMode::Citizen,
            dunkelmodus: false,
            zahlung_verzoegerung_ms: 2000,
            fragen_pro_tag_free: 5,
        }
    }
}
