//! Base64-Dekodierung der TTS-Nutzlast
//!
//! Akzeptiert das Standard-Alphabet mit oder ohne Padding. ASCII-Whitespace
//! (Zeilenumbrueche in laengeren Nutzlasten) wird vor dem Dekodieren
//! entfernt, alle anderen Fremdzeichen fuehren zu einem Fehler.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::trace;

use crate::error::AudioResult;

/// Standard-Alphabet, Padding optional, nicht-kanonische Restbits erlaubt
const PCM_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Dekodiert einen Base64-Text in Rohbytes.
///
/// Bei ungueltiger Eingabe wird `AudioError::Dekodierung` zurueckgegeben,
/// es entsteht nie ein teilweise gefuellter Puffer.
pub fn decode_base64(text: &str) -> AudioResult<Vec<u8>> {
    let bereinigt: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = PCM_BASE64.decode(bereinigt.as_bytes())?;
    trace!(eingabe = text.len(), bytes = bytes.len(), "Base64 dekodiert");
    Ok(bytes)
}
