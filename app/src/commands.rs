//! Befehlsparser fuer die Terminal-Oberflaeche
//!
//! Zeilen ohne fuehrenden `/` sind Fragen an den Assistenten. Befehle
//! haben die Form `/name [argumente]`, Argumente mit Leerzeichen koennen
//! in "..." gesetzt werden.

use std::path::PathBuf;

use sanvidhan_core::{SanvidhanError, SubscriptionPlan, UserMode};
use thiserror::Error;

/// Fehler beim Parsen einer Eingabezeile
#[derive(Debug, Error)]
pub enum BefehlFehler {
    #[error("Unbekannter Befehl: /{0} (Hilfe mit /help)")]
    Unbekannt(String),

    #[error("Argument fehlt: {0}")]
    ArgumentFehlt(&'static str),

    #[error("Ungueltige Nummer: {0}")]
    UngueltigeNummer(String),

    #[error(transparent)]
    Domain(#[from] SanvidhanError),
}

/// Ein geparster Befehl
#[derive(Debug, Clone, PartialEq)]
pub enum Befehl {
    /// Frage an den Assistenten
    Frage(String),
    Modus(UserMode),
    Sprache(String),
    Artikel(String),
    PdfAnhaengen(PathBuf),
    PdfEntfernen,
    /// Lesezeichen fuer die Nachricht mit dieser Nummer umschalten
    Lesezeichen(usize),
    LesezeichenAnzeigen,
    /// Lesezeichen als JSON exportieren (ohne Pfad: Ausgabe im Terminal)
    Export(Option<PathBuf>),
    /// Nachricht vorlesen (ohne Nummer: letzte Antwort)
    Vorlesen(Option<usize>),
    /// Frage als Spracheingabe stellen
    Spracheingabe(String),
    Plaene,
    Kaufen(SubscriptionPlan),
    Design,
    Verlauf,
    Hilfe,
    Beenden,
}

/// Hilfetext aller Befehle
pub const HILFE: &str = "\
Befehle:
  <frage>              Frage zur Verfassung stellen
  /mode <citizen|student|legal>
  /lang <code>         Antwortsprache (en, hi, ta, te, mr, bn, gu, kn, ml, pa)
  /article <nummer>    Artikel nachschlagen
  /pdf <pfad>|off      Verfassungs-PDF anhaengen oder entfernen
  /bookmark <nr>       Lesezeichen fuer Nachricht <nr> umschalten
  /bookmarks           Lesezeichen anzeigen
  /export [pfad]       Lesezeichen als JSON exportieren
  /speak [nr]          Nachricht vorlesen (Standard: letzte Antwort)
  /voice <frage>       Frage als Spracheingabe stellen
  /plans               Abo-Plaene anzeigen
  /buy <premium|institutional>
  /theme               Dunkelmodus umschalten
  /history             Verlauf anzeigen
  /help                Diese Hilfe
  /quit                Beenden";

/// Parst eine Eingabezeile. Leere Zeilen ergeben `None`.
pub fn parse_zeile(zeile: &str) -> Result<Option<Befehl>, BefehlFehler> {
    let zeile = zeile.trim();
    if zeile.is_empty() {
        return Ok(None);
    }
    let Some(rest) = zeile.strip_prefix('/') else {
        return Ok(Some(Befehl::Frage(zeile.to_string())));
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };
    let argument = entquoten(argument);

    let befehl = match name.to_lowercase().as_str() {
        "mode" => Befehl::Modus(pflicht(&argument, "modus")?.parse()?),
        "lang" => Befehl::Sprache(pflicht(&argument, "sprachcode")?.to_string()),
        "article" => Befehl::Artikel(pflicht(&argument, "artikelnummer")?.to_string()),
        "pdf" => match pflicht(&argument, "pfad oder off")? {
            "off" => Befehl::PdfEntfernen,
            pfad => Befehl::PdfAnhaengen(PathBuf::from(pfad)),
        },
        "bookmark" => Befehl::Lesezeichen(nummer(pflicht(&argument, "nachrichtennummer")?)?),
        "bookmarks" => Befehl::LesezeichenAnzeigen,
        "export" => Befehl::Export((!argument.is_empty()).then(|| PathBuf::from(&argument))),
        "speak" => Befehl::Vorlesen(if argument.is_empty() {
            None
        } else {
            Some(nummer(&argument)?)
        }),
        "voice" => Befehl::Spracheingabe(pflicht(&argument, "frage")?.to_string()),
        "plans" => Befehl::Plaene,
        "buy" => Befehl::Kaufen(pflicht(&argument, "plan")?.parse()?),
        "theme" => Befehl::Design,
        "history" => Befehl::Verlauf,
        "help" | "?" => Befehl::Hilfe,
        "quit" | "exit" => Befehl::Beenden,
        andere => return Err(BefehlFehler::Unbekannt(andere.to_string())),
    };
    Ok(Some(befehl))
}

fn pflicht<'a>(argument: &'a str, name: &'static str) -> Result<&'a str, BefehlFehler> {
    if argument.is_empty() {
        Err(BefehlFehler::ArgumentFehlt(name))
    } else {
        Ok(argument)
    }
}

/// Nachrichtennummern beginnen bei 1
fn nummer(s: &str) -> Result<usize, BefehlFehler> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(BefehlFehler::UngueltigeNummer(s.to_string())),
    }
}

/// Entfernt umschliessende Anfuehrungszeichen und loest `\"` und `\\` auf
fn entquoten(s: &str) -> String {
    let innen = s
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(s);

    let mut ergebnis = String::with_capacity(innen.len());
    let mut chars = innen.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => ergebnis.push(next),
                Some(other) => {
                    ergebnis.push('\\');
                    ergebnis.push(other);
                }
                None => ergebnis.push('\\'),
            }
        } else {
            ergebnis.push(c);
        }
    }
    ergebnis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(zeile: &str) -> Befehl {
        parse_zeile(zeile).unwrap().unwrap()
    }

    #[test]
    fn leere_zeile() {
        assert!(parse_zeile("   ").unwrap().is_none());
    }

    #[test]
    fn text_ist_frage() {
        assert_eq!(
            parse("  What does Article 21 say? "),
            Befehl::Frage("What does Article 21 say?".into())
        );
    }

    #[test]
    fn modus_und_plan() {
        assert_eq!(parse("/mode Legal"), Befehl::Modus(UserMode::Legal));
        assert_eq!(parse("/buy premium"), Befehl::Kaufen(SubscriptionPlan::Premium));
        assert_eq!(
            parse("/buy institutional"),
            Befehl::Kaufen(SubscriptionPlan::StudentInstitution)
        );
        assert!(matches!(parse_zeile("/mode judge"), Err(BefehlFehler::Domain(_))));
    }

    #[test]
    fn befehlsname_gross_klein_egal() {
        assert_eq!(parse("/HELP"), Befehl::Hilfe);
        assert_eq!(parse("/Quit"), Befehl::Beenden);
    }

    #[test]
    fn pdf_mit_leerzeichen_im_pfad() {
        assert_eq!(
            parse(r#"/pdf "/tmp/Constitution of India.pdf""#),
            Befehl::PdfAnhaengen(PathBuf::from("/tmp/Constitution of India.pdf"))
        );
        assert_eq!(parse("/pdf off"), Befehl::PdfEntfernen);
    }

    #[test]
    fn nummern() {
        assert_eq!(parse("/bookmark 3"), Befehl::Lesezeichen(3));
        assert_eq!(parse("/speak"), Befehl::Vorlesen(None));
        assert_eq!(parse("/speak 2"), Befehl::Vorlesen(Some(2)));
        assert!(matches!(
            parse_zeile("/bookmark 0"),
            Err(BefehlFehler::UngueltigeNummer(_))
        ));
        assert!(matches!(
            parse_zeile("/speak zwei"),
            Err(BefehlFehler::UngueltigeNummer(_))
        ));
    }

    #[test]
    fn fehlende_argumente() {
        for zeile in ["/mode", "/lang", "/article", "/pdf", "/bookmark", "/voice", "/buy"] {
            assert!(
                matches!(parse_zeile(zeile), Err(BefehlFehler::ArgumentFehlt(_))),
                "{zeile} sollte ein Argument verlangen"
            );
        }
    }

    #[test]
    fn artikel_und_spracheingabe() {
        assert_eq!(parse("/article 21A"), Befehl::Artikel("21A".into()));
        assert_eq!(
            parse("/voice what is article 14"),
            Befehl::Spracheingabe("what is article 14".into())
        );
        assert_eq!(parse("/export"), Befehl::Export(None));
        assert_eq!(
            parse("/export merkliste.json"),
            Befehl::Export(Some(PathBuf::from("merkliste.json")))
        );
    }

    #[test]
    fn unbekannter_befehl() {
        let err = parse_zeile("/tanzen").unwrap_err();
        assert_eq!(err.to_string(), "Unbekannter Befehl: /tanzen (Hilfe mit /help)");
    }

    #[test]
    fn entquoten_escapes() {
        assert_eq!(entquoten(r#""a \"b\" c""#), r#"a "b" c"#);
        assert_eq!(entquoten(r"C:\\pfad"), r"C:\pfad");
        assert_eq!(entquoten("ohne"), "ohne");
    }
}
