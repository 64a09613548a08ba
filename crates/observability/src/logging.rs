//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable (ueberschreibt die Konfigdatei):
//! - `SV_LOG_LEVEL`: Filter-Direktive (z.B. `debug` oder
//!   `info,sanvidhan_audio=trace`), Standard: info
//! - `SV_LOG_FORMAT`: Format (text/json), Standard: text

use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

pub const LEVEL_ENV: &str = "SV_LOG_LEVEL";
pub const FORMAT_ENV: &str = "SV_LOG_FORMAT";

/// Ausgabeformat der Log-Zeilen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            andere => Err(anyhow!("Unbekanntes Log-Format: {andere}")),
        }
    }
}

/// Aufgeloeste Logging-Einstellungen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEinstellungen {
    pub filter: String,
    pub format: LogFormat,
}

impl LogEinstellungen {
    /// Kombiniert Konfigwerte mit optionalen Umgebungswerten.
    ///
    /// Leere oder ungueltige Werte fallen auf `info` / `text` zurueck.
    pub fn aufloesen(
        level: &str,
        format: &str,
        level_env: Option<String>,
        format_env: Option<String>,
    ) -> Self {
        let filter = level_env
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| level.to_string());
        let filter = if EnvFilter::try_new(&filter).is_ok() && !filter.trim().is_empty() {
            filter
        } else {
            "info".to_string()
        };

        let format = format_env
            .as_deref()
            .unwrap_or(format)
            .parse()
            .unwrap_or_default();

        Self { filter, format }
    }

    /// Liest `SV_LOG_LEVEL` / `SV_LOG_FORMAT` aus der Umgebung
    pub fn aus_umgebung(level: &str, format: &str) -> Self {
        Self::aufloesen(
            level,
            format,
            std::env::var(LEVEL_ENV).ok(),
            std::env::var(FORMAT_ENV).ok(),
        )
    }
}

/// Initialisiert das Logging-System.
///
/// Schlaegt fehl wenn bereits ein globaler Subscriber gesetzt ist.
pub fn logging_initialisieren(level: &str, format: &str) -> Result<LogEinstellungen> {
    let einstellungen = LogEinstellungen::aus_umgebung(level, format);
    let filter = EnvFilter::try_new(&einstellungen.filter)?;

    let ergebnis = match einstellungen.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };
    ergebnis.map_err(|e| anyhow!("Logging konnte nicht initialisiert werden: {e}"))?;

    Ok(einstellungen)
}

/// Validiert ob ein einfacher Log-Level-String gueltig ist
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}
