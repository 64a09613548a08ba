//! sanvidhan-app – Terminal-Oberflaeche
//!
//! Verbindet Konfiguration, Gemini-Client, Audio-Ausgabe und Sitzung und
//! bedient die Sitzung ueber eine zeilenbasierte Eingabe.

pub mod commands;
pub mod config;

use std::io::Write as _;
use std::sync::Arc;

use anyhow::Result;
use sanvidhan_audio::{
    get_default_output, CpalOutputFactory, OutputFactory, PlaybackController,
    SimulatedOutputFactory,
};
use sanvidhan_core::{pricing_plans, Message, Rolle};
use sanvidhan_gemini::{GeminiClient, SpeechSynthesizer, TextGenerator};
use sanvidhan_session::{Antwort, SessionError, SessionService, Sprachausgabe, VoiceService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use commands::{parse_zeile, Befehl, HILFE};
use config::AppConfig;

/// Ob die Eingabeschleife weiterlaeuft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steuerung {
    Weiter,
    Beenden,
}

/// Die laufende Terminal-Anwendung
pub struct App {
    session: SessionService,
}

impl App {
    /// Baut die App mit Gemini-Client und Audio-Ausgabe laut Konfiguration
    pub fn neu(config: &AppConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::aus_umgebung(config.gemini.clone())?);

        let factory: Arc<dyn OutputFactory> = if config.audio.simuliert {
            info!("Audio-Ausgabe simuliert");
            Arc::new(SimulatedOutputFactory)
        } else {
            match get_default_output() {
                Some(geraet) => info!(
                    geraet = %geraet.name,
                    raten = ?geraet.sample_rates,
                    "Standard-Ausgabegeraet"
                ),
                None => warn!("Kein Standard-Ausgabegeraet gefunden"),
            }
            Arc::new(CpalOutputFactory::new(config.audio.ausgabegeraet.clone()))
        };

        Self::mit_diensten(config, gemini.clone(), gemini, factory)
    }

    /// Baut die App mit beliebigen Diensten (Tests, andere Backends)
    pub fn mit_diensten(
        config: &AppConfig,
        generator: Arc<dyn TextGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        factory: Arc<dyn OutputFactory>,
    ) -> Result<Self> {
        let format = config.audio.pcm_format()?;
        let controller = Arc::new(PlaybackController::new(factory));
        let voice = VoiceService::neu(synthesizer, controller, format);
        let session = SessionService::neu(config.sitzung.clone(), generator, voice)?;
        Ok(Self { session })
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    /// Liest Zeilen von stdin bis `/quit`, EOF oder Ctrl-C
    pub async fn starten(self) -> Result<()> {
        let mut aus = String::new();
        verlauf_schreiben(&self.session.messages(), &[], &mut aus);
        aus.push_str("Hilfe mit /help\n");
        print!("{aus}");

        let mut zeilen = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let zeile = tokio::select! {
                zeile = zeilen.next_line() => zeile?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(zeile) = zeile else { break };

            let mut aus = String::new();
            let steuerung = self.zeile_ausfuehren(&zeile, &mut aus).await;
            print!("{aus}");
            if steuerung == Steuerung::Beenden {
                break;
            }
        }

        info!("Sitzung beendet");
        Ok(())
    }

    /// Fuehrt eine Eingabezeile aus und haengt die Ausgabe an `aus` an
    pub async fn zeile_ausfuehren(&self, zeile: &str, aus: &mut String) -> Steuerung {
        let befehl = match parse_zeile(zeile) {
            Ok(Some(befehl)) => befehl,
            Ok(None) => return Steuerung::Weiter,
            Err(e) => {
                aus.push_str(&format!("Fehler: {e}\n"));
                return Steuerung::Weiter;
            }
        };

        match self.ausfuehren(befehl, aus).await {
            Ok(steuerung) => steuerung,
            Err(e) => {
                aus.push_str(&format!("Fehler: {e}\n"));
                if e.zeigt_preise() {
                    plaene_schreiben(self.session.plan(), aus);
                }
                Steuerung::Weiter
            }
        }
    }

    async fn ausfuehren(&self, befehl: Befehl, aus: &mut String) -> Result<Steuerung, SessionError> {
        match befehl {
            Befehl::Frage(text) => {
                let antwort = self.session.send_message(&text, false).await?;
                self.antwort_schreiben(antwort, aus);
            }
            Befehl::Spracheingabe(text) => {
                let locale = self.session.listen_locale()?;
                aus.push_str(&format!("(Spracheingabe, {locale})\n"));
                let antwort = self.session.send_message(&text, true).await?;
                self.antwort_schreiben(antwort, aus);
            }
            Befehl::Artikel(nummer) => {
                let antwort = self.session.lookup_article(&nummer).await?;
                self.antwort_schreiben(antwort, aus);
            }
            Befehl::Modus(mode) => {
                self.session.set_mode(mode);
                aus.push_str(&format!("Modus: {mode}\n"));
            }
            Befehl::Sprache(code) => {
                let sprache = self.session.set_language(&code)?;
                aus.push_str(&format!("Sprache: {} ({})\n", sprache.name, sprache.native_name));
            }
            Befehl::PdfAnhaengen(pfad) => {
                let name = self.session.attach_pdf(&pfad).await?;
                aus.push_str(&format!("Verfassungs-PDF aktiv als Quelle: {name}\n"));
            }
            Befehl::PdfEntfernen => {
                if self.session.detach_pdf() {
                    aus.push_str("PDF entfernt\n");
                } else {
                    aus.push_str("Kein PDF angehaengt\n");
                }
            }
            Befehl::Lesezeichen(nr) => {
                let nachricht = self.nachricht_nr(nr)?;
                if self.session.toggle_bookmark(&nachricht.id)? {
                    aus.push_str(&format!("Lesezeichen gesetzt: [{nr}]\n"));
                } else {
                    aus.push_str(&format!("Lesezeichen entfernt: [{nr}]\n"));
                }
            }
            Befehl::LesezeichenAnzeigen => {
                let bookmarks = self.session.bookmarks();
                if bookmarks.is_empty() {
                    aus.push_str("Noch keine Lesezeichen\n");
                }
                for b in bookmarks {
                    aus.push_str(&format!("* {} ({})\n", b.title, b.article_id));
                }
            }
            Befehl::Export(pfad) => {
                let json = self.session.export_bookmarks()?;
                match pfad {
                    Some(pfad) => {
                        tokio::fs::write(&pfad, json).await?;
                        aus.push_str(&format!("Lesezeichen exportiert: {}\n", pfad.display()));
                    }
                    None => {
                        aus.push_str(&json);
                        aus.push('\n');
                    }
                }
            }
            Befehl::Vorlesen(nr) => {
                let nachricht = match nr {
                    Some(nr) => self.nachricht_nr(nr)?,
                    None => self
                        .session
                        .messages()
                        .into_iter()
                        .rev()
                        .find(|m| m.role == Rolle::Model)
                        .ok_or_else(|| SessionError::UngueltigeEingabe("Keine Antwort vorhanden".into()))?,
                };
                let ausgabe = self.session.speak(&nachricht.content).await?;
                sprachausgabe_schreiben(&ausgabe, aus);
            }
            Befehl::Plaene => plaene_schreiben(self.session.plan(), aus),
            Befehl::Kaufen(plan) => {
                aus.push_str("Zahlung wird verarbeitet ...\n");
                self.session.simulate_payment(plan).await?;
                aus.push_str(&format!(
                    "Welcome to Sanvidhan AI {}. Voice features are now unlocked.\n",
                    plan.anzeigename()
                ));
            }
            Befehl::Design => {
                let an = self.session.toggle_theme();
                aus.push_str(if an { "Dunkelmodus an\n" } else { "Dunkelmodus aus\n" });
            }
            Befehl::Verlauf => {
                let bookmarks: Vec<_> = self.session.bookmarks().iter().map(|b| b.id).collect();
                verlauf_schreiben(&self.session.messages(), &bookmarks, aus);
            }
            Befehl::Hilfe => {
                aus.push_str(HILFE);
                aus.push('\n');
            }
            Befehl::Beenden => return Ok(Steuerung::Beenden),
        }
        Ok(Steuerung::Weiter)
    }

    /// Nachricht anhand ihrer angezeigten Nummer (ab 1)
    fn nachricht_nr(&self, nr: usize) -> Result<Message, SessionError> {
        self.session
            .messages()
            .into_iter()
            .nth(nr.saturating_sub(1))
            .ok_or_else(|| SessionError::NachrichtNichtGefunden(format!("[{nr}]")))
    }

    fn antwort_schreiben(&self, antwort: Option<Antwort>, aus: &mut String) {
        let Some(antwort) = antwort else { return };
        let nr = self.session.messages().len();
        aus.push_str(&format!("[{nr}] Sanvidhan: {}\n", antwort.nachricht.content));
        if let Some(ausgabe) = &antwort.sprachausgabe {
            sprachausgabe_schreiben(ausgabe, aus);
        }
    }
}

fn sprachausgabe_schreiben(ausgabe: &Sprachausgabe, aus: &mut String) {
    aus.push_str(match ausgabe {
        Sprachausgabe::Gestartet(_) => "(wird vorgelesen)\n",
        Sprachausgabe::Uebersprungen => "(es wird bereits vorgelesen)\n",
        Sprachausgabe::KeinAudio => "(kein Audio erhalten)\n",
    });
}

fn verlauf_schreiben(
    messages: &[Message],
    gemerkt: &[sanvidhan_core::MessageId],
    aus: &mut String,
) {
    for (i, m) in messages.iter().enumerate() {
        let wer = match m.role {
            Rolle::User if m.is_voice => "Du (Sprache)",
            Rolle::User => "Du",
            Rolle::Model => "Sanvidhan",
        };
        let stern = if gemerkt.contains(&m.id) { " *" } else { "" };
        aus.push_str(&format!("[{}] {wer}{stern}: {}\n", i + 1, m.content));
    }
}

fn plaene_schreiben(aktuell: sanvidhan_core::SubscriptionPlan, aus: &mut String) {
    for plan in pricing_plans() {
        let markierung = if plan.plan == aktuell { " (aktiv)" } else { "" };
        aus.push_str(&format!("{} – {}{markierung}\n", plan.name, plan.price));
        for feature in plan.features {
            aus.push_str(&format!("    - {feature}\n"));
        }
    }
    aus.push_str("Kaufen mit /buy premium oder /buy institutional\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sanvidhan_gemini::{ChatAnfrage, GeminiResult};

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, anfrage: ChatAnfrage<'_>) -> GeminiResult<String> {
            let frage = anfrage.verlauf.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(format!("Antwort auf: {frage}"))
        }
    }

    struct Stille;

    #[async_trait]
    impl SpeechSynthesizer for Stille {
        async fn synthesize(&self, _text: &str) -> GeminiResult<Option<String>> {
            Ok(Some("AAAAQA==".into()))
        }
    }

    fn app() -> App {
        App::mit_diensten(
            &AppConfig::default(),
            Arc::new(Echo),
            Arc::new(Stille),
            Arc::new(SimulatedOutputFactory),
        )
        .unwrap()
    }

    async fn ausfuehren(app: &App, zeile: &str) -> (Steuerung, String) {
        let mut aus = String::new();
        let s = app.zeile_ausfuehren(zeile, &mut aus).await;
        (s, aus)
    }

    #[tokio::test]
    async fn frage_wird_beantwortet() {
        let app = app();
        let (s, aus) = ausfuehren(&app, "Article 21?").await;
        assert_eq!(s, Steuerung::Weiter);
        assert_eq!(aus, "[3] Sanvidhan: Antwort auf: Article 21?\n");
    }

    #[tokio::test]
    async fn beenden() {
        let app = app();
        assert_eq!(ausfuehren(&app, "/quit").await.0, Steuerung::Beenden);
    }

    #[tokio::test]
    async fn fehler_werden_angezeigt() {
        let app = app();
        let (s, aus) = ausfuehren(&app, "/tanzen").await;
        assert_eq!(s, Steuerung::Weiter);
        assert!(aus.starts_with("Fehler: Unbekannter Befehl"));

        let (_, aus) = ausfuehren(&app, "/lang xx").await;
        assert!(aus.contains("Nicht unterstuetzte Sprache"));
    }

    #[tokio::test]
    async fn vorlesen_ohne_abo_zeigt_preise() {
        let app = app();
        let (_, aus) = ausfuehren(&app, "/speak").await;
        assert!(aus.contains("bezahltes Abo"));
        assert!(aus.contains("Premium – ₹499/yr"));
        assert!(aus.contains("Free – ₹0 (aktiv)"));
    }

    #[tokio::test(start_paused = true)]
    async fn nach_kauf_wird_vorgelesen() {
        let app = app();
        let (_, aus) = ausfuehren(&app, "/buy premium").await;
        assert!(aus.contains("Voice features are now unlocked"));

        let (_, aus) = ausfuehren(&app, "/speak 1").await;
        assert_eq!(aus, "(wird vorgelesen)\n");

        let (_, aus) = ausfuehren(&app, "/voice Article 14?").await;
        assert!(aus.starts_with("(Spracheingabe, en-IN)\n"));
        assert!(aus.contains("Antwort auf: Article 14?"));
    }

    #[tokio::test]
    async fn lesezeichen_und_export() {
        let app = app();
        ausfuehren(&app, "Article 19?").await;

        let (_, aus) = ausfuehren(&app, "/bookmark 3").await;
        assert_eq!(aus, "Lesezeichen gesetzt: [3]\n");
        let (_, aus) = ausfuehren(&app, "/bookmark 2").await;
        assert!(aus.contains("Nur Antworten"));
        let (_, aus) = ausfuehren(&app, "/bookmark 9").await;
        assert!(aus.contains("Nachricht nicht gefunden"));

        let (_, aus) = ausfuehren(&app, "/history").await;
        assert!(aus.contains("[3] Sanvidhan *:"));

        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("merkliste.json");
        let (_, aus) = ausfuehren(&app, &format!("/export \"{}\"", pfad.display())).await;
        assert!(aus.starts_with("Lesezeichen exportiert"));
        let inhalt = std::fs::read_to_string(&pfad).unwrap();
        assert!(inhalt.contains("\"article_id\": \"Extracted\""));
    }

    #[tokio::test]
    async fn modus_sprache_design() {
        let app = app();
        assert_eq!(ausfuehren(&app, "/mode legal").await.1, "Modus: Legal Awareness\n");
        assert_eq!(ausfuehren(&app, "/lang hi").await.1, "Sprache: Hindi (हिन्दी)\n");
        assert_eq!(ausfuehren(&app, "/theme").await.1, "Dunkelmodus an\n");
        assert_eq!(app.session().language(), "hi");
    }

    #[tokio::test]
    async fn artikel_nachschlagen() {
        let app = app();
        let (_, aus) = ausfuehren(&app, "/article 32").await;
        assert!(aus.contains("explanation for Article 32 of the Indian Constitution"));
    }

    #[tokio::test]
    async fn pdf_anhaengen_und_entfernen() {
        let app = app();
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("coi.pdf");
        std::fs::write(&pfad, b"%PDF-1.4").unwrap();

        let (_, aus) = ausfuehren(&app, &format!("/pdf {}", pfad.display())).await;
        assert_eq!(aus, "Verfassungs-PDF aktiv als Quelle: coi.pdf\n");
        assert_eq!(ausfuehren(&app, "/pdf off").await.1, "PDF entfernt\n");
        assert_eq!(ausfuehren(&app, "/pdf off").await.1, "Kein PDF angehaengt\n");
    }
}
