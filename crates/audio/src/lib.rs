//! sanvidhan-audio – Audio-Pipeline fuer die Sprachausgabe
//!
//! Pipeline fuer die vom TTS-Dienst gelieferten Audiodaten:
//! - Base64-Text -> Rohbytes
//! - Rohbytes (PCM i16 LE, interleaved) -> normalisierte f32-Kanaele
//! - Playback via cpal mit Abschluss-Signal
//! - Single-Flight: hoechstens eine Wiedergabe gleichzeitig

pub mod controller;
pub mod device;
pub mod encoding;
pub mod error;
pub mod playback;
pub mod transcode;

// Bequeme Re-Exporte der wichtigsten Typen
pub use controller::{CompletionSignal, EndCallback, OutputContext, OutputFactory, PlaybackController};
pub use device::{
    get_default_output, list_output_devices, AudioDevice, CpalOutputFactory, SimulatedOutputFactory,
};
pub use encoding::decode_base64;
pub use error::{AudioError, AudioResult};
pub use transcode::{decode_audio_data, PcmFormat, SampleBuffer, TTS_SAMPLE_RATE};
