//! App-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte, die App laeuft also auch ohne Konfigurationsdatei.
//! Der Gemini-API-Schluessel kommt nur aus der Umgebung.

use sanvidhan_audio::{AudioResult, PcmFormat, TTS_SAMPLE_RATE};
use sanvidhan_gemini::GeminiConfig;
use sanvidhan_session::SitzungConfig;
use serde::{Deserialize, Serialize};

/// Vollstaendige App-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gemini-Anbindung (Modelle, Stimme, Sampling)
    pub gemini: GeminiConfig,
    /// Audio-Ausgabe
    pub audio: AudioEinstellungen,
    /// Startwerte der Sitzung
    pub sitzung: SitzungConfig,
    pub logging: LoggingEinstellungen,
}

/// Audio-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioEinstellungen {
    /// Abtastrate des TTS-Audios in Hz
    pub sample_rate: u32,
    /// Kanalanzahl des TTS-Audios
    pub kanaele: u16,
    /// Teilstring des Ausgabegeraete-Namens (leer = Standardgeraet)
    pub ausgabegeraet: Option<String>,
    /// Ohne Geraet abspielen (Headless-Betrieb)
    pub simuliert: bool,
}

impl Default for AudioEinstellungen {
    fn default() -> Self {
        Self {
            sample_rate: TTS_SAMPLE_RATE,
            kanaele: 1,
            ausgabegeraet: None,
            simuliert: false,
        }
    }
}

impl AudioEinstellungen {
    /// PCM-Format des TTS-Audios, 0 Hz oder 0 Kanaele werden abgelehnt
    pub fn pcm_format(&self) -> AudioResult<PcmFormat> {
        PcmFormat::new(self.sample_rate, self.kanaele)
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl AppConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanvidhan_core::UserMode;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.audio.sample_rate, 24000);
        assert_eq!(cfg.audio.kanaele, 1);
        assert_eq!(cfg.gemini.stimme, "Kore");
        assert_eq!(cfg.sitzung.fragen_pro_tag_free, 5);
        assert!(cfg.audio.pcm_format().is_ok());
    }

    #[test]
    fn toml_teilweise() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [audio]
            simuliert = true
            ausgabegeraet = "USB"

            [sitzung]
            sprache = "hi"
            modus = "student"

            [gemini]
            top_k = 32
            "#,
        )
        .unwrap();
        assert!(cfg.audio.simuliert);
        assert_eq!(cfg.audio.ausgabegeraet.as_deref(), Some("USB"));
        assert_eq!(cfg.audio.sample_rate, 24000);
        assert_eq!(cfg.sitzung.sprache, "hi");
        assert_eq!(cfg.sitzung.modus, UserMode::Student);
        assert_eq!(cfg.gemini.top_k, 32);
        assert_eq!(cfg.gemini.chat_modell, "gemini-3-flash-preview");
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn null_kanaele_abgelehnt() {
        let audio = AudioEinstellungen {
            kanaele: 0,
            ..Default::default()
        };
        assert!(audio.pcm_format().is_err());
    }

    #[test]
    fn fehlende_datei_ergibt_standardwerte() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("gibt-es-nicht.toml");
        let cfg = AppConfig::laden(pfad.to_str().unwrap()).unwrap();
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn kaputte_datei_ist_fehler() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("config.toml");
        std::fs::write(&pfad, "[audio\nsample_rate = ").unwrap();
        assert!(AppConfig::laden(pfad.to_str().unwrap()).is_err());
    }
}
