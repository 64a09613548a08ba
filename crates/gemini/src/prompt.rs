//! Prompt-Aufbau fuer Chat-Anfragen
//!
//! Die eigentliche Frage wird mit Sprache und der Instruktion des Modus
//! zu einem Prompt zusammengesetzt. Fruehere Nachrichten gehen als
//! eigene Turns mit, ein optionales PDF steht vor dem Prompt im letzten
//! Benutzer-Turn.

use sanvidhan_core::{system_instruction, Message, Rolle, UserMode};

use crate::error::{GeminiError, GeminiResult};
use crate::wire::{Content, Part};

/// Antwort wenn das Modell keinen Text liefert
pub const FALLBACK_ANTWORT: &str = "I apologize, I could not generate a response.";

/// MIME-Typ des angehaengten Verfassungs-Dokuments
pub const PDF_MIME: &str = "application/pdf";

/// Setzt den Prompt fuer eine einzelne Frage zusammen
pub fn compose_prompt(language: &str, mode: UserMode, frage: &str) -> String {
    format!(
        "Current Language: {language}. \n\n{}\n\nUser Question: {frage}",
        system_instruction(mode)
    )
}

fn rolle_name(rolle: Rolle) -> &'static str {
    match rolle {
        Rolle::User => "user",
        Rolle::Model => "model",
    }
}

/// Baut die `contents` einer Chat-Anfrage.
///
/// Die letzte Nachricht muss vom Benutzer stammen. Modell-Nachrichten vor
/// der ersten Benutzer-Nachricht (Begruessung) werden nicht mitgeschickt.
pub fn build_contents(
    verlauf: &[Message],
    mode: UserMode,
    language: &str,
    pdf_base64: Option<&str>,
) -> GeminiResult<Vec<Content>> {
    let (frage, frueher) = verlauf.split_last().ok_or(GeminiError::KeineFrage)?;
    if frage.role != Rolle::User {
        return Err(GeminiError::KeineFrage);
    }

    let mut contents: Vec<Content> = frueher
        .iter()
        .skip_while(|m| m.role == Rolle::Model)
        .map(|m| Content::mit_rolle(rolle_name(m.role), vec![Part::text(m.content.clone())]))
        .collect();

    let mut parts = Vec::with_capacity(2);
    if let Some(pdf) = pdf_base64 {
        parts.push(Part::inline(PDF_MIME, pdf));
    }
    parts.push(Part::text(compose_prompt(language, mode, &frage.content)));
    contents.push(Content::mit_rolle("user", parts));

    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_format() {
        let p = compose_prompt("hi", UserMode::Student, "What is Article 14?");
        assert!(p.starts_with("Current Language: hi. \n\nYou are Sanvidhan AI, a pedagogical expert"));
        assert!(p.ends_with("\n\nUser Question: What is Article 14?"));
    }

    #[test]
    fn nur_frage() {
        let verlauf = vec![Message::model("Namaste!"), Message::user("Article 21?", false)];
        let contents = build_contents(&verlauf, UserMode::Citizen, "en", None).unwrap();
        assert_eq!(contents.len(), 1, "Begruessung wird nicht mitgeschickt");
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[0].parts.len(), 1);
        let text = contents[0].parts[0].text.as_deref().unwrap();
        assert!(text.contains("User Question: Article 21?"));
    }

    #[test]
    fn verlauf_und_pdf() {
        let verlauf = vec![
            Message::model("Namaste!"),
            Message::user("Article 14?", false),
            Message::model("Equality before law."),
            Message::user("And 15?", true),
        ];
        let contents = build_contents(&verlauf, UserMode::Legal, "en", Some("JVBERi0=")).unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].parts[0].text.as_deref(), Some("Article 14?"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        let letzter = &contents[2];
        assert_eq!(letzter.parts.len(), 2);
        let pdf = letzter.parts[0].inline_data.as_ref().unwrap();
        assert_eq!(pdf.mime_type, "application/pdf");
        assert_eq!(pdf.data, "JVBERi0=");
        assert!(letzter.parts[1].text.as_deref().unwrap().ends_with("User Question: And 15?"));
    }

    #[test]
    fn ohne_benutzerfrage() {
        assert!(matches!(
            build_contents(&[], UserMode::Citizen, "en", None),
            Err(GeminiError::KeineFrage)
        ));
        let nur_modell = vec![Message::model("Namaste!")];
        assert!(build_contents(&nur_modell, UserMode::Citizen, "en", None).is_err());
    }
}
