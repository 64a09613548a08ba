//! Audio-Playback via cpal
//!
//! Oeffnet einen cpal OutputStream fuer genau einen Sample-Puffer. Die
//! Samples liegen vollstaendig in einem lock-free Ring-Buffer, der
//! cpal-Callback liest daraus und meldet das Ende des Puffers einmalig
//! ueber einen crossbeam-Kanal.

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{BuildStreamError, Device, SampleFormat, Stream, StreamConfig, SupportedStreamConfigRange};
use crossbeam_channel::{bounded, Receiver, Sender};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;
use tracing::{debug, error};

use crate::error::{AudioError, AudioResult};
use crate::transcode::SampleBuffer;

/// Laufender Einmal-Stream. Der Stream wird beim Drop geschlossen.
pub struct BufferStream {
    _stream: Stream,
    ausgabe_kanaele: u16,
}

impl BufferStream {
    /// Kanalanzahl, mit der das Geraet tatsaechlich bespielt wird
    pub fn ausgabe_kanaele(&self) -> u16 {
        self.ausgabe_kanaele
    }
}

/// Waehlt Sample-Format und Kanalanzahl fuer die gewuenschte Rate.
///
/// Bevorzugt eine Konfiguration mit mindestens `kanaele` Kanaelen. Meldet
/// das Geraet gar keine Konfiguration, wird F32 mit `kanaele` versucht.
/// Deckt keine gemeldete Konfiguration die Rate ab, ist die Ausgabe nicht
/// verfuegbar.
fn format_waehlen(
    konfigs: &[SupportedStreamConfigRange],
    sample_rate: u32,
    kanaele: u16,
) -> AudioResult<(SampleFormat, u16)> {
    if konfigs.is_empty() {
        return Ok((SampleFormat::F32, kanaele));
    }

    let passend: Vec<_> = konfigs
        .iter()
        .filter(|c| c.min_sample_rate().0 <= sample_rate && c.max_sample_rate().0 >= sample_rate)
        .collect();

    passend
        .iter()
        .filter(|c| c.channels() >= kanaele)
        .min_by_key(|c| c.channels())
        .or_else(|| passend.iter().max_by_key(|c| c.channels()))
        .map(|c| (c.sample_format(), c.channels()))
        .ok_or_else(|| {
            AudioError::NichtVerfuegbar(format!("Geraet unterstuetzt {sample_rate} Hz nicht"))
        })
}

fn ausgabe_format(device: &Device, sample_rate: u32, kanaele: u16) -> AudioResult<(SampleFormat, u16)> {
    let konfigs: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::NichtVerfuegbar(e.to_string()))?
        .collect();
    format_waehlen(&konfigs, sample_rate, kanaele)
}

fn build_fehler(e: BuildStreamError) -> AudioError {
    match e {
        BuildStreamError::DeviceNotAvailable | BuildStreamError::StreamConfigNotSupported => {
            AudioError::NichtVerfuegbar(e.to_string())
        }
        _ => AudioError::StreamFehler(e.to_string()),
    }
}

/// Fuellt einen Geraete-Puffer aus dem Ring-Buffer, Rest mit Stille.
///
/// Das Ende wird erst gemeldet, wenn ein Aufruf keine Samples mehr liest.
/// Der letzte Teilpuffer ist dann bereits an das Geraet uebergeben.
fn puffer_fuellen<C: Consumer<Item = f32>>(
    consumer: &mut C,
    data: &mut [f32],
    ende_tx: &mut Option<Sender<()>>,
) -> usize {
    let read = consumer.pop_slice(data);
    data[read..].fill(0.0);
    if read == 0 {
        if let Some(tx) = ende_tx.take() {
            let _ = tx.try_send(());
        }
    }
    read
}

/// Oeffnet einen Stream, der `buffer` einmal abspielt.
///
/// Gibt den Stream und einen Empfaenger zurueck, der genau eine Nachricht
/// erhaelt sobald der Callback nach dem letzten Sample nur noch Stille liefert.
pub fn open_buffer_stream(
    device: &Device,
    sample_rate: u32,
    buffer: &SampleBuffer,
) -> AudioResult<(BufferStream, Receiver<()>)> {
    let quell_kanaele = u16::try_from(buffer.num_channels())
        .map_err(|_| AudioError::Konfiguration("Zu viele Kanaele".into()))?;
    let (sample_format, ausgabe_kanaele) = ausgabe_format(device, sample_rate, quell_kanaele)?;

    let stream_config = StreamConfig {
        channels: ausgabe_kanaele,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let samples = buffer.interleave(usize::from(ausgabe_kanaele));
    let rb = HeapRb::<f32>::new(samples.len().max(1));
    let (mut producer, mut consumer) = rb.split();
    producer.push_slice(&samples);

    let (ende_tx, ende_rx) = bounded::<()>(1);
    let mut ende_tx: Option<Sender<()>> = Some(ende_tx);

    let err_fn = |err| error!("Playback-Fehler: {}", err);

    let stream = match sample_format {
        SampleFormat::F32 => device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _| {
                    puffer_fuellen(&mut consumer, data, &mut ende_tx);
                },
                err_fn,
                None,
            )
            .map_err(build_fehler)?,
        SampleFormat::I16 => device
            .build_output_stream(
                &stream_config,
                move |data: &mut [i16], _| {
                    let mut float_buf = vec![0.0f32; data.len()];
                    puffer_fuellen(&mut consumer, &mut float_buf, &mut ende_tx);
                    for (out, s) in data.iter_mut().zip(float_buf.iter()) {
                        *out = (*s * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                    }
                },
                err_fn,
                None,
            )
            .map_err(build_fehler)?,
        _ => {
            return Err(AudioError::NichtVerfuegbar(format!(
                "Nicht unterstuetztes Sample-Format: {:?}",
                sample_format
            )))
        }
    };

    stream
        .play()
        .map_err(|e| AudioError::StreamFehler(e.to_string()))?;

    debug!(
        sample_rate,
        ausgabe_kanaele,
        frames = buffer.frame_count(),
        "Playback-Stream geoeffnet"
    );

    Ok((
        BufferStream {
            _stream: stream,
            ausgabe_kanaele,
        },
        ende_rx,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::{decode_audio_data, PcmFormat};
    use cpal::traits::HostTrait;
    use cpal::SupportedBufferSize;
    use crossbeam_channel::TryRecvError;
    use std::time::Duration;

    fn konfig(kanaele: u16, min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            kanaele,
            cpal::SampleRate(min),
            cpal::SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn ende_erst_nach_leerem_callback() {
        let (mut producer, mut consumer) = HeapRb::<f32>::new(4).split();
        producer.push_slice(&[0.5, -0.5]);
        let (tx, rx) = bounded::<()>(1);
        let mut ende_tx = Some(tx);

        // Teilpuffer: Samples gehen ans Geraet, noch kein Ende
        let mut data = [1.0f32; 8];
        assert_eq!(puffer_fuellen(&mut consumer, &mut data, &mut ende_tx), 2);
        assert_eq!(&data[..2], &[0.5, -0.5]);
        assert!(data[2..].iter().all(|s| *s == 0.0));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        // Erster reiner Stille-Callback meldet das Ende
        let mut data = [1.0f32; 8];
        assert_eq!(puffer_fuellen(&mut consumer, &mut data, &mut ende_tx), 0);
        assert!(data.iter().all(|s| *s == 0.0));
        assert_eq!(rx.try_recv(), Ok(()));

        // Danach kein weiteres Signal
        assert_eq!(puffer_fuellen(&mut consumer, &mut data, &mut ende_tx), 0);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn voller_callback_meldet_kein_ende() {
        let (mut producer, mut consumer) = HeapRb::<f32>::new(8).split();
        producer.push_slice(&[0.25; 8]);
        let (tx, rx) = bounded::<()>(1);
        let mut ende_tx = Some(tx);

        let mut data = [0.0f32; 4];
        assert_eq!(puffer_fuellen(&mut consumer, &mut data, &mut ende_tx), 4);
        assert_eq!(puffer_fuellen(&mut consumer, &mut data, &mut ende_tx), 4);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(ende_tx.is_some());
    }

    #[test]
    fn format_mit_passender_rate() {
        let konfigs = [
            konfig(2, 8000, 48000, SampleFormat::I16),
            konfig(1, 8000, 48000, SampleFormat::F32),
        ];
        assert_eq!(format_waehlen(&konfigs, 24000, 1).unwrap(), (SampleFormat::F32, 1));
        assert_eq!(format_waehlen(&konfigs, 24000, 2).unwrap(), (SampleFormat::I16, 2));
    }

    #[test]
    fn fehlende_rate_ist_nicht_verfuegbar() {
        let konfigs = [konfig(2, 48000, 48000, SampleFormat::F32)];
        let err = format_waehlen(&konfigs, 24000, 1).unwrap_err();
        assert!(matches!(err, AudioError::NichtVerfuegbar(_)));
        assert!(err.ist_geraetefehler());
    }

    #[test]
    fn ohne_gemeldete_konfiguration_wird_f32_versucht() {
        assert_eq!(format_waehlen(&[], 24000, 1).unwrap(), (SampleFormat::F32, 1));
    }

    #[test]
    fn nicht_unterstuetzte_stream_config_ist_geraetefehler() {
        assert!(build_fehler(BuildStreamError::StreamConfigNotSupported).ist_geraetefehler());
        assert!(!build_fehler(BuildStreamError::InvalidArgument).ist_geraetefehler());
    }

    #[test]
    #[ignore = "Benoetigt Audio-Hardware"]
    fn puffer_wird_bis_zum_ende_abgespielt() {
        let host = cpal::default_host();
        if let Some(device) = host.default_output_device() {
            let buffer = decode_audio_data(&vec![0u8; 4800], PcmFormat::default());
            let (stream, ende) = open_buffer_stream(&device, 24000, &buffer)
                .expect("Playback-Stream sollte oeffenbar sein");
            assert!(stream.ausgabe_kanaele() >= 1);
            assert!(ende.recv_timeout(Duration::from_secs(2)).is_ok());
        }
    }
}
