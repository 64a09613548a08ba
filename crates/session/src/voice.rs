//! Sprachausgabe: TTS -> Base64 -> PCM -> Wiedergabe
//!
//! Der `VoiceService` haelt ein eigenes Sprech-Flag ueber die gesamte
//! Pipeline (Abruf, Dekodierung, Wiedergabe). Es wird vor dem TTS-Aufruf
//! gesetzt und bei Abschluss oder bei jedem Fehler wieder geloescht.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sanvidhan_audio::{
    decode_audio_data, decode_base64, CompletionSignal, PcmFormat, PlaybackController,
};
use sanvidhan_gemini::SpeechSynthesizer;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// Ergebnis eines Sprachausgabe-Auftrags
#[derive(Debug)]
pub enum Sprachausgabe {
    /// Wiedergabe laeuft; der Task endet mit der Wiedergabe
    Gestartet(JoinHandle<()>),
    /// Es wird bereits gesprochen, der Auftrag wurde ignoriert
    Uebersprungen,
    /// Der TTS-Dienst lieferte kein Audio
    KeinAudio,
}

/// Belegtes Flag, das beim Drop wieder freigegeben wird
pub(crate) struct Belegung(Arc<AtomicBool>);

impl Belegung {
    /// Belegt das Flag, None wenn es bereits belegt ist
    pub(crate) fn belegen(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for Belegung {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Verbindet Sprachsynthese und Audio-Pipeline
pub struct VoiceService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    controller: Arc<PlaybackController>,
    format: PcmFormat,
    speaking: Arc<AtomicBool>,
}

impl VoiceService {
    pub fn neu(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        controller: Arc<PlaybackController>,
        format: PcmFormat,
    ) -> Self {
        Self {
            synthesizer,
            controller,
            format,
            speaking: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Gibt zurueck ob gerade gesprochen wird (inkl. TTS-Abruf)
    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Acquire)
    }

    /// Spricht `text`. Muss innerhalb einer Tokio-Runtime aufgerufen werden.
    pub async fn speak(&self, text: &str) -> SessionResult<Sprachausgabe> {
        let Some(belegung) = Belegung::belegen(&self.speaking) else {
            debug!("Sprachausgabe laeuft bereits, Auftrag ignoriert");
            return Ok(Sprachausgabe::Uebersprungen);
        };

        match self.abspielen(text).await {
            Ok(Some(signal)) => {
                let handle = tokio::spawn(async move {
                    if let Err(e) = signal.await {
                        warn!(fehler = %e, "Wiedergabe ohne Abschluss beendet");
                    }
                    drop(belegung);
                });
                Ok(Sprachausgabe::Gestartet(handle))
            }
            Ok(None) => {
                info!("TTS-Dienst lieferte kein Audio");
                Ok(Sprachausgabe::KeinAudio)
            }
            Err(e) => {
                warn!(fehler = %e, "Sprachausgabe fehlgeschlagen");
                Err(e)
            }
        }
    }

    async fn abspielen(&self, text: &str) -> SessionResult<Option<CompletionSignal>> {
        let Some(kodiert) = self.synthesizer.synthesize(text).await? else {
            return Ok(None);
        };

        let bytes = decode_base64(&kodiert)?;
        let buffer = decode_audio_data(&bytes, self.format);
        debug!(
            bytes = bytes.len(),
            frames = buffer.frame_count(),
            sample_rate = buffer.sample_rate(),
            "TTS-Audio dekodiert"
        );

        let controller = Arc::clone(&self.controller);
        let signal = tokio::task::spawn_blocking(move || controller.play(buffer))
            .await
            .map_err(|e| SessionError::Anyhow(e.into()))??;
        Ok(Some(signal))
    }
}
