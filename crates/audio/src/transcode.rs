//! PCM-Transcoding: i16 little-endian (interleaved) -> f32 pro Kanal
//!
//! Normierung erfolgt durch Division mit 32768 (2^15). Der groesste
//! positive Wert ist damit 32767/32768, der kleinste exakt -1.0.
//! Ein ungerades Restbyte und unvollstaendige Frames am Ende werden
//! stillschweigend verworfen.

use std::time::Duration;

use crate::error::{AudioError, AudioResult};

/// Abtastrate der TTS-Nutzlast (PCM 16 Bit, Mono)
pub const TTS_SAMPLE_RATE: u32 = 24000;

/// Normierungsfaktor fuer i16 -> f32
const I16_SKALA: f32 = 32768.0;

/// Beschreibt das Format eines rohen PCM-Puffers.
///
/// Abtastrate und Kanalanzahl sind immer groesser als 0, das wird bei
/// der Konstruktion geprueft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    sample_rate: u32,
    channels: u16,
}

impl PcmFormat {
    /// Erstellt ein neues Format, lehnt 0 Hz oder 0 Kanaele ab
    pub fn new(sample_rate: u32, channels: u16) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::Konfiguration("Abtastrate muss groesser 0 sein".into()));
        }
        if channels == 0 {
            return Err(AudioError::Konfiguration("Kanalanzahl muss groesser 0 sein".into()));
        }
        Ok(Self { sample_rate, channels })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: TTS_SAMPLE_RATE,
            channels: 1,
        }
    }
}

/// De-interleavter Sample-Puffer, ein f32-Vektor pro Kanal
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    frame_count: usize,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Samples eines Kanals (None bei ungueltigem Index)
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Abspieldauer bei der eigenen Abtastrate
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count as f64 / self.sample_rate as f64)
    }

    /// Verschraenkt die Kanaele fuer ein Ausgabegeraet mit `ausgabe_kanaele`
    /// Kanaelen. Fehlende Quellkanaele werden mit dem letzten Quellkanal
    /// aufgefuellt (Mono wird auf alle Lautsprecher verteilt), ueberzaehlige
    /// Quellkanaele fallen weg.
    pub fn interleave(&self, ausgabe_kanaele: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count * ausgabe_kanaele);
        let letzter = self.channels.len().saturating_sub(1);
        for i in 0..self.frame_count {
            for ch in 0..ausgabe_kanaele {
                out.push(self.channels[ch.min(letzter)][i]);
            }
        }
        out
    }
}

/// Interpretiert `data` als interleavtes PCM i16 LE und erzeugt einen
/// normalisierten Sample-Puffer.
pub fn decode_audio_data(data: &[u8], format: PcmFormat) -> SampleBuffer {
    let num_channels = usize::from(format.channels());

    let samples: Vec<i16> = data
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();

    let frame_count = samples.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frame_count); num_channels];

    // chunks_exact verwirft unvollstaendige Frames am Ende
    for frame in samples.chunks_exact(num_channels) {
        for (kanal, &sample) in channels.iter_mut().zip(frame) {
            kanal.push(f32::from(sample) / I16_SKALA);
        }
    }

    SampleBuffer {
        sample_rate: format.sample_rate(),
        frame_count,
        channels,
    }
}
