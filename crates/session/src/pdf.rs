//! Laden des Verfassungs-PDFs als Quelle fuer die Antworten

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::info;

use crate::error::{SessionError, SessionResult};
use crate::state::PdfAnhang;

/// Magische Bytes am Anfang jeder PDF-Datei
const PDF_KENNUNG: &[u8] = b"%PDF";

/// Liest eine PDF-Datei und kodiert sie fuer den Inline-Versand.
///
/// Dateien ohne `%PDF`-Kennung werden abgelehnt.
pub async fn pdf_laden(pfad: &Path) -> SessionResult<PdfAnhang> {
    let daten = tokio::fs::read(pfad).await?;
    if !daten.starts_with(PDF_KENNUNG) {
        return Err(SessionError::UngueltigeEingabe(format!(
            "Keine PDF-Datei: {}",
            pfad.display()
        )));
    }

    let dateiname = pfad
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pfad.display().to_string());
    info!(datei = %dateiname, bytes = daten.len(), "Verfassungs-PDF geladen");

    Ok(PdfAnhang {
        dateiname,
        base64: STANDARD.encode(&daten),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pdf_wird_kodiert() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("constitution.pdf");
        std::fs::write(&pfad, b"%PDF-1.7\n").unwrap();

        let anhang = pdf_laden(&pfad).await.unwrap();
        assert_eq!(anhang.dateiname, "constitution.pdf");
        assert_eq!(anhang.base64, "JVBERi0xLjcK");
    }

    #[tokio::test]
    async fn andere_datei_abgelehnt() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("notizen.pdf");
        std::fs::write(&pfad, b"kein pdf").unwrap();
        assert!(matches!(
            pdf_laden(&pfad).await,
            Err(SessionError::UngueltigeEingabe(_))
        ));
    }

    #[tokio::test]
    async fn fehlende_datei_ist_io_fehler() {
        let dir = tempfile::tempdir().unwrap();
        let err = pdf_laden(&dir.path().join("fehlt.pdf")).await.unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
