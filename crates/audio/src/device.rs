//! Ausgabegeraete und Ausgabe-Kontexte
//!
//! - Enumeration und Auswahl der cpal-Ausgabegeraete
//! - `CpalOutputFactory`: echter Ausgabe-Kontext auf dem Host-Geraet
//! - `SimulatedOutputFactory`: Kontext ohne Geraet (Headless-Betrieb),
//!   der die Abspieldauer nur abwartet

use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::Device;
use crossbeam_channel::bounded;
use tracing::{debug, info, warn};

use crate::controller::{EndCallback, OutputContext, OutputFactory};
use crate::error::{AudioError, AudioResult};
use crate::playback::open_buffer_stream;
use crate::transcode::SampleBuffer;

/// Zusaetzliche Wartezeit ueber die Pufferdauer hinaus, bevor ein
/// ausbleibendes Ende-Signal als Ende gewertet wird
const NACHLAUF: Duration = Duration::from_secs(2);

/// Repraesentiert ein Ausgabegeraet mit seinen Eigenschaften
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Anzeigename des Geraets
    pub name: String,
    /// Unterstuetzte Abtastraten (gaengige Raten)
    pub sample_rates: Vec<u32>,
    /// Maximale Kanalanzahl
    pub channels: u16,
}

/// Listet alle verfuegbaren Ausgabegeraete auf
pub fn list_output_devices() -> AudioResult<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let devices = host
        .output_devices()
        .map_err(|e| AudioError::StreamFehler(e.to_string()))?;

    let mut result = Vec::new();
    for device in devices {
        match device_to_audio_device(&device) {
            Ok(ad) => result.push(ad),
            Err(e) => warn!("Ausgabegeraet konnte nicht gelesen werden: {}", e),
        }
    }
    debug!("Gefundene Ausgabegeraete: {}", result.len());
    Ok(result)
}

/// Gibt das Standard-Ausgabegeraet zurueck
pub fn get_default_output() -> Option<AudioDevice> {
    let host = cpal::default_host();
    host.default_output_device()
        .and_then(|d| device_to_audio_device(&d).ok())
}

/// Laedt ein cpal-Device anhand des Namens fuer Ausgabe (None = Standard)
pub fn load_cpal_output_device(name: Option<&str>) -> AudioResult<Device> {
    let host = cpal::default_host();
    match name {
        None => host
            .default_output_device()
            .ok_or(AudioError::KeinStandardAusgabegeraet),
        Some(n) => {
            let devices = host
                .output_devices()
                .map_err(|e| AudioError::StreamFehler(e.to_string()))?;
            for device in devices {
                if let Ok(dev_name) = device.name() {
                    if dev_name.contains(n) {
                        return Ok(device);
                    }
                }
            }
            Err(AudioError::GeraetNichtGefunden(n.to_string()))
        }
    }
}

// Hilfsfunktion: cpal Device -> AudioDevice
fn device_to_audio_device(device: &Device) -> AudioResult<AudioDevice> {
    let name = device
        .name()
        .map_err(|e| AudioError::StreamFehler(e.to_string()))?;

    let mut sample_rates = Vec::new();
    let mut max_channels = 1u16;

    if let Ok(configs) = device.supported_output_configs() {
        for cfg in configs {
            let min = cfg.min_sample_rate().0;
            let max = cfg.max_sample_rate().0;
            // Gaengige Raten pruefen
            for rate in [16000u32, 24000, 44100, 48000] {
                if rate >= min && rate <= max && !sample_rates.contains(&rate) {
                    sample_rates.push(rate);
                }
            }
            if cfg.channels() > max_channels {
                max_channels = cfg.channels();
            }
        }
    }

    sample_rates.sort_unstable();

    Ok(AudioDevice {
        name,
        sample_rates,
        channels: max_channels,
    })
}

/// Erzeugt Ausgabe-Kontexte auf einem cpal-Geraet
#[derive(Debug, Clone, Default)]
pub struct CpalOutputFactory {
    /// Teilstring des Geraetenamens (None = Standardgeraet)
    geraet: Option<String>,
}

impl CpalOutputFactory {
    pub fn new(geraet: Option<String>) -> Self {
        Self { geraet }
    }
}

impl OutputFactory for CpalOutputFactory {
    fn create(&self, sample_rate: u32) -> AudioResult<Arc<dyn OutputContext>> {
        // Geraet einmal oeffnen um Verfuegbarkeit zu pruefen
        let device = load_cpal_output_device(self.geraet.as_deref())
            .map_err(|e| AudioError::NichtVerfuegbar(e.to_string()))?;
        let name = device.name().unwrap_or_else(|_| "<unbekannt>".into());
        info!(geraet = %name, sample_rate, "cpal Ausgabe-Kontext bereit");

        Ok(Arc::new(CpalOutputContext {
            geraet: self.geraet.clone(),
            sample_rate,
        }))
    }
}

/// Ausgabe-Kontext auf einem cpal-Geraet.
///
/// cpal::Stream ist !Send, daher lebt jeder Wiedergabe-Knoten in einem
/// eigenen std::thread, der den Stream bis zum Pufferende haelt und
/// danach freigibt.
pub struct CpalOutputContext {
    geraet: Option<String>,
    sample_rate: u32,
}

impl OutputContext for CpalOutputContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&self, buffer: SampleBuffer, on_end: EndCallback) -> AudioResult<()> {
        let (start_tx, start_rx) = bounded::<AudioResult<()>>(1);
        let geraet = self.geraet.clone();
        let sample_rate = self.sample_rate;
        let max_dauer = buffer.duration() + NACHLAUF;

        std::thread::Builder::new()
            .name("sanvidhan-playback".to_string())
            .spawn(move || {
                let geoeffnet = load_cpal_output_device(geraet.as_deref())
                    .and_then(|device| open_buffer_stream(&device, sample_rate, &buffer));

                let (stream, ende_rx) = match geoeffnet {
                    Ok(v) => {
                        let _ = start_tx.send(Ok(()));
                        v
                    }
                    Err(e) => {
                        let _ = start_tx.send(Err(e));
                        return;
                    }
                };

                if ende_rx.recv_timeout(max_dauer).is_err() {
                    warn!("Kein Ende-Signal vom Geraet, Wiedergabe wird beendet");
                }
                drop(stream);
                on_end();
            })
            .map_err(|e| AudioError::StreamFehler(e.to_string()))?;

        start_rx
            .recv()
            .map_err(|e| AudioError::StreamFehler(e.to_string()))?
    }
}

/// Erzeugt Kontexte ohne Geraet (Headless, CI)
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedOutputFactory;

impl OutputFactory for SimulatedOutputFactory {
    fn create(&self, sample_rate: u32) -> AudioResult<Arc<dyn OutputContext>> {
        info!(sample_rate, "Simulierter Ausgabe-Kontext bereit");
        Ok(Arc::new(SimulatedOutputContext { sample_rate }))
    }
}

/// Wartet die Abspieldauer ab und meldet dann das Ende
struct SimulatedOutputContext {
    sample_rate: u32,
}

impl OutputContext for SimulatedOutputContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&self, buffer: SampleBuffer, on_end: EndCallback) -> AudioResult<()> {
        let dauer = Duration::from_secs_f64(buffer.frame_count() as f64 / self.sample_rate as f64);
        std::thread::Builder::new()
            .name("sanvidhan-playback-sim".to_string())
            .spawn(move || {
                std::thread::sleep(dauer);
                on_end();
            })
            .map_err(|e| AudioError::StreamFehler(e.to_string()))?;
        Ok(())
    }
}
