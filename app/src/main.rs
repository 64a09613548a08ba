//! Sanvidhan AI – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet die
//! Terminal-Oberflaeche. Mit `--geraete` werden nur die Ausgabegeraete
//! aufgelistet.

use anyhow::Result;
use sanvidhan_app::{config::AppConfig, App};
use sanvidhan_observability::logging_initialisieren;

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("SANVIDHAN_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = AppConfig::laden(&config_pfad)?;
    logging_initialisieren(&config.logging.level, &config.logging.format)?;

    if std::env::args().skip(1).any(|a| a == "--geraete") {
        for geraet in sanvidhan_audio::list_output_devices()? {
            println!("{} ({} Kanaele, {:?} Hz)", geraet.name, geraet.channels, geraet.sample_rates);
        }
        return Ok(());
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Sanvidhan AI wird gestartet"
    );

    let app = App::neu(&config)?;
    app.starten().await
}
