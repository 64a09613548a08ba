//! PlaybackController – Wiedergabe eines Sample-Puffers mit Abschluss-Signal
//!
//! Zustandsmaschine `Idle -> Playing -> Idle`. Der Controller besitzt:
//! - den Ausgabe-Kontext der Sitzung (lazy erzeugt, danach fest)
//! - das Single-Flight-Flag: eine zweite Wiedergabe waehrend einer
//!   laufenden wird mit `AudioError::WiedergabeAktiv` abgelehnt
//!
//! Das Abschluss-Signal ist ein `tokio::sync::oneshot`, das genau einmal
//! aufgeloest wird wenn das Geraet das Pufferende meldet.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::{AudioError, AudioResult};
use crate::transcode::SampleBuffer;

/// Wird genau einmal aufgerufen wenn ein Puffer fertig abgespielt ist
pub type EndCallback = Box<dyn FnOnce() + Send + 'static>;

/// Ein Ausgabe-Kontext mit fester Abtastrate
pub trait OutputContext: Send + Sync {
    /// Abtastrate, mit der der Kontext erzeugt wurde
    fn sample_rate(&self) -> u32;

    /// Haengt einen einmaligen Wiedergabe-Knoten fuer `buffer` an und
    /// startet ihn sofort.
    ///
    /// Vertrag: Bei `Ok` wird `on_end` genau einmal aufgerufen sobald das
    /// Pufferende erreicht ist. Bei `Err` wird `on_end` nie aufgerufen.
    fn start(&self, buffer: SampleBuffer, on_end: EndCallback) -> AudioResult<()>;
}

/// Erzeugt Ausgabe-Kontexte (cpal, simuliert, Test-Doubles)
pub trait OutputFactory: Send + Sync {
    fn create(&self, sample_rate: u32) -> AudioResult<Arc<dyn OutputContext>>;
}

/// Abschluss-Signal einer Wiedergabe
#[derive(Debug)]
pub struct CompletionSignal {
    rx: oneshot::Receiver<()>,
}

impl CompletionSignal {
    /// Blockiert bis die Wiedergabe beendet ist (nicht aus async-Kontext aufrufen)
    pub fn blocking_wait(self) -> AudioResult<()> {
        self.rx.blocking_recv().map_err(|_| signal_verloren())
    }
}

impl Future for CompletionSignal {
    type Output = AudioResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.map_err(|_| signal_verloren()))
    }
}

fn signal_verloren() -> AudioError {
    AudioError::StreamFehler("Wiedergabe ohne Abschluss-Signal beendet".into())
}

/// Steuert die Wiedergabe auf dem Ausgabe-Kontext der Sitzung
pub struct PlaybackController {
    factory: Arc<dyn OutputFactory>,
    context: Mutex<Option<Arc<dyn OutputContext>>>,
    playing: Arc<AtomicBool>,
}

impl PlaybackController {
    /// Erstellt einen Controller, der Kontexte ueber `factory` erzeugt
    pub fn new(factory: Arc<dyn OutputFactory>) -> Self {
        Self {
            factory,
            context: Mutex::new(None),
            playing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Gibt den Ausgabe-Kontext zurueck und erzeugt ihn beim ersten Aufruf.
    ///
    /// Spaetere Aufrufe mit anderer Rate aendern nichts, die urspruengliche
    /// Rate bleibt bestehen. Schlaegt die Erzeugung fehl, wird nichts
    /// gespeichert und ein spaeterer Aufruf versucht es erneut.
    pub fn ensure_context(&self, sample_rate: u32) -> AudioResult<Arc<dyn OutputContext>> {
        let mut slot = self.context.lock();
        if let Some(ctx) = slot.as_ref() {
            if ctx.sample_rate() != sample_rate {
                debug!(
                    vorhanden = ctx.sample_rate(),
                    angefragt = sample_rate,
                    "Ausgabe-Kontext existiert bereits, angefragte Rate wird ignoriert"
                );
            }
            return Ok(Arc::clone(ctx));
        }

        let ctx = self.factory.create(sample_rate).map_err(|e| match e {
            AudioError::NichtVerfuegbar(_) => e,
            andere => AudioError::NichtVerfuegbar(andere.to_string()),
        })?;
        info!(sample_rate = ctx.sample_rate(), "Ausgabe-Kontext erzeugt");
        *slot = Some(Arc::clone(&ctx));
        Ok(ctx)
    }

    /// Startet die Wiedergabe von `buffer` und kehrt zurueck, sobald der
    /// Ausgabe-Knoten laeuft. Das Oeffnen des Geraets blockiert kurz, aus
    /// async-Code daher ueber `spawn_blocking` aufrufen.
    ///
    /// Laeuft bereits eine Wiedergabe, wird mit `AudioError::WiedergabeAktiv`
    /// abgelehnt ohne einen weiteren Knoten anzulegen.
    pub fn play(&self, buffer: SampleBuffer) -> AudioResult<CompletionSignal> {
        if self
            .playing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Wiedergabe abgelehnt: es laeuft bereits eine");
            return Err(AudioError::WiedergabeAktiv);
        }

        match self.start_session(buffer) {
            Ok(signal) => Ok(signal),
            Err(e) => {
                self.playing.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    fn start_session(&self, buffer: SampleBuffer) -> AudioResult<CompletionSignal> {
        let ctx = self.ensure_context(buffer.sample_rate())?;
        if ctx.sample_rate() != buffer.sample_rate() {
            // Kein Resampling: der Puffer laeuft mit der Rate des Kontexts
            warn!(
                kontext = ctx.sample_rate(),
                puffer = buffer.sample_rate(),
                "Abtastrate weicht vom Ausgabe-Kontext ab"
            );
        }

        let frames = buffer.frame_count();
        let (tx, rx) = oneshot::channel();
        let playing = Arc::clone(&self.playing);

        ctx.start(
            buffer,
            Box::new(move || {
                playing.store(false, Ordering::Release);
                let _ = tx.send(());
                debug!(frames, "Wiedergabe beendet");
            }),
        )?;

        debug!(frames, "Wiedergabe gestartet");
        Ok(CompletionSignal { rx })
    }

    /// Gibt zurueck ob gerade eine Wiedergabe laeuft
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Gibt zurueck ob der Ausgabe-Kontext bereits erzeugt wurde
    pub fn has_context(&self) -> bool {
        self.context.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::decode_base64;
    use crate::transcode::{decode_audio_data, PcmFormat};
    use std::sync::atomic::AtomicUsize;

    /// Kontext, dessen Wiedergaben erst auf Anforderung enden
    struct ManuellerKontext {
        sample_rate: u32,
        gestartet: AtomicUsize,
        offen: Mutex<Vec<(SampleBuffer, EndCallback)>>,
    }

    impl ManuellerKontext {
        fn alle_beenden(&self) {
            let offen: Vec<_> = self.offen.lock().drain(..).collect();
            for (_, on_end) in offen {
                on_end();
            }
        }
    }

    impl OutputContext for ManuellerKontext {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn start(&self, buffer: SampleBuffer, on_end: EndCallback) -> AudioResult<()> {
            self.gestartet.fetch_add(1, Ordering::SeqCst);
            self.offen.lock().push((buffer, on_end));
            Ok(())
        }
    }

    struct ManuelleFactory {
        erzeugt: AtomicUsize,
        fehlschlaege: AtomicUsize,
        kontext: Mutex<Option<Arc<ManuellerKontext>>>,
    }

    impl ManuelleFactory {
        fn neu(fehlschlaege: usize) -> Arc<Self> {
            Arc::new(Self {
                erzeugt: AtomicUsize::new(0),
                fehlschlaege: AtomicUsize::new(fehlschlaege),
                kontext: Mutex::new(None),
            })
        }

        fn kontext(&self) -> Arc<ManuellerKontext> {
            self.kontext.lock().clone().expect("Kontext sollte erzeugt sein")
        }
    }

    impl OutputFactory for ManuelleFactory {
        fn create(&self, sample_rate: u32) -> AudioResult<Arc<dyn OutputContext>> {
            if self.fehlschlaege.load(Ordering::SeqCst) > 0 {
                self.fehlschlaege.fetch_sub(1, Ordering::SeqCst);
                return Err(AudioError::KeinStandardAusgabegeraet);
            }
            self.erzeugt.fetch_add(1, Ordering::SeqCst);
            let ctx = Arc::new(ManuellerKontext {
                sample_rate,
                gestartet: AtomicUsize::new(0),
                offen: Mutex::new(Vec::new()),
            });
            *self.kontext.lock() = Some(Arc::clone(&ctx));
            Ok(ctx as Arc<dyn OutputContext>)
        }
    }

    fn puffer(bytes: &[u8]) -> SampleBuffer {
        decode_audio_data(bytes, PcmFormat::default())
    }

    #[test]
    fn kontext_wird_lazy_und_einmalig_erzeugt() {
        let factory = ManuelleFactory::neu(0);
        let controller = PlaybackController::new(factory.clone());
        assert!(!controller.has_context());

        let a = controller.ensure_context(24000).unwrap();
        let b = controller.ensure_context(48000).unwrap();
        assert_eq!(factory.erzeugt.load(Ordering::SeqCst), 1);
        assert_eq!(a.sample_rate(), 24000);
        assert_eq!(b.sample_rate(), 24000, "Urspruengliche Rate gewinnt");
        assert!(controller.has_context());
    }

    #[test]
    fn fehlende_ausgabe_wird_als_nicht_verfuegbar_gemeldet() {
        let factory = ManuelleFactory::neu(1);
        let controller = PlaybackController::new(factory.clone());

        let err = controller.play(puffer(&[0, 0])).unwrap_err();
        assert!(matches!(err, AudioError::NichtVerfuegbar(_)));
        assert!(err.ist_geraetefehler());
        assert!(!controller.is_playing(), "Flag muss nach Fehler frei sein");

        // Zweiter Versuch erzeugt den Kontext
        assert!(controller.play(puffer(&[0, 0])).is_ok());
        assert_eq!(factory.erzeugt.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zweite_wiedergabe_wird_abgelehnt() {
        let factory = ManuelleFactory::neu(0);
        let controller = PlaybackController::new(factory.clone());

        let signal = controller.play(puffer(&[0, 0, 0, 0x40])).unwrap();
        assert!(controller.is_playing());

        let zweite = controller.play(puffer(&[0, 0]));
        assert!(matches!(zweite, Err(AudioError::WiedergabeAktiv)));
        assert_eq!(factory.kontext().gestartet.load(Ordering::SeqCst), 1);

        factory.kontext().alle_beenden();
        signal.await.unwrap();
        assert!(!controller.is_playing());

        // Nach dem Abschluss ist eine neue Wiedergabe moeglich
        assert!(controller.play(puffer(&[0, 0])).is_ok());
        assert_eq!(factory.kontext().gestartet.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn ende_zu_ende_mit_base64() {
        let factory = ManuelleFactory::neu(0);
        let controller = PlaybackController::new(factory.clone());

        let bytes = decode_base64("AAAAQA==").unwrap();
        let buffer = decode_audio_data(&bytes, PcmFormat::default());
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.channel(0).unwrap(), &[0.0, 0.5]);

        let signal = controller.play(buffer).unwrap();
        {
            let ctx = factory.kontext();
            let offen = ctx.offen.lock();
            assert_eq!(offen.len(), 1);
            assert_eq!(offen[0].0.frame_count(), 2);
        }
        factory.kontext().alle_beenden();
        signal.await.expect("Abschluss-Signal sollte genau einmal feuern");
        assert!(!controller.is_playing());
    }

    #[test]
    fn verworfenes_callback_meldet_fehler() {
        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);
        let signal = CompletionSignal { rx };
        assert!(signal.blocking_wait().is_err());
    }
}
