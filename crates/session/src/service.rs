//! SessionService – Fragen, Artikel, PDF, Lesezeichen, Abo, Sprachausgabe

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use parking_lot::Mutex;
use sanvidhan_core::{
    sprache_finden, Bookmark, Language, Message, MessageId, SanvidhanError, SubscriptionPlan,
    UserMode,
};
use sanvidhan_gemini::{ChatAnfrage, TextGenerator};
use tracing::{debug, info, warn};

use crate::config::SitzungConfig;
use crate::error::{SessionError, SessionResult};
use crate::pdf::pdf_laden;
use crate::quota::Tageskontingent;
use crate::state::{SessionState, VERBINDUNGSFEHLER};
use crate::voice::{Belegung, Sprachausgabe, VoiceService};

/// Ergebnis einer beantworteten Frage
#[derive(Debug)]
pub struct Antwort {
    /// Die an den Verlauf angehaengte Antwort
    pub nachricht: Message,
    /// Der Chat-Dienst war nicht erreichbar, `nachricht` ist der Hinweistext
    pub fehlgeschlagen: bool,
    /// Automatische Sprachausgabe (Frage per Sprache, Premium-Plan)
    pub sprachausgabe: Option<Sprachausgabe>,
}

/// Verwaltet eine Sitzung mit dem Assistenten
pub struct SessionService {
    generator: Arc<dyn TextGenerator>,
    voice: VoiceService,
    config: SitzungConfig,
    state: Mutex<SessionState>,
    kontingent: Mutex<Tageskontingent>,
    loading: Arc<AtomicBool>,
}

impl SessionService {
    /// Erstellt eine Sitzung mit Begruessung
    pub fn neu(
        config: SitzungConfig,
        generator: Arc<dyn TextGenerator>,
        voice: VoiceService,
    ) -> SessionResult<Self> {
        let state = SessionState::neu(&config)?;
        info!(sprache = %state.language, modus = %state.mode, "Sitzung gestartet");

        Ok(Self {
            generator,
            voice,
            config,
            state: Mutex::new(state),
            kontingent: Mutex::new(Tageskontingent::default()),
            loading: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Stellt eine Frage.
    ///
    /// Leere Eingaben und Eingaben waehrend einer laufenden Anfrage werden
    /// ignoriert (`Ok(None)`). Ein Fehler des Chat-Dienstes beendet die
    /// Sitzung nicht, sondern wird als Hinweis-Antwort angehaengt.
    pub async fn send_message(&self, text: &str, from_voice: bool) -> SessionResult<Option<Antwort>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let Some(belegung) = Belegung::belegen(&self.loading) else {
            debug!("Anfrage laeuft bereits, Eingabe ignoriert");
            return Ok(None);
        };

        let (verlauf, mode, language, pdf, plan) = {
            let mut state = self.state.lock();
            self.kontingent.lock().beanspruchen(
                state.plan,
                self.config.fragen_pro_tag_free,
                Local::now().date_naive(),
            )?;
            state.messages.push(Message::user(text, from_voice));
            (
                state.messages.clone(),
                state.mode,
                state.language.clone(),
                state.pdf.as_ref().map(|p| p.base64.clone()),
                state.plan,
            )
        };

        let ergebnis = self
            .generator
            .generate(ChatAnfrage {
                verlauf: &verlauf,
                mode,
                language: &language,
                pdf_base64: pdf.as_deref(),
            })
            .await;

        let (nachricht, fehlgeschlagen) = match ergebnis {
            Ok(text) => (Message::model(text), false),
            Err(e) => {
                warn!(fehler = %e, "Chat-Anfrage fehlgeschlagen");
                self.kontingent.lock().freigeben();
                (Message::model(VERBINDUNGSFEHLER), true)
            }
        };
        self.state.lock().messages.push(nachricht.clone());
        // Sprachausgabe haelt keine Anfrage-Sperre
        drop(belegung);

        let sprachausgabe = if from_voice && !fehlgeschlagen && plan == SubscriptionPlan::Premium {
            match self.voice.speak(&nachricht.content).await {
                Ok(s) => Some(s),
                Err(e) => {
                    warn!(fehler = %e, "Automatische Sprachausgabe fehlgeschlagen");
                    None
                }
            }
        } else {
            None
        };

        Ok(Some(Antwort {
            nachricht,
            fehlgeschlagen,
            sprachausgabe,
        }))
    }

    /// Fragt nach der Erklaerung eines Verfassungsartikels
    pub async fn lookup_article(&self, artikel: &str) -> SessionResult<Option<Antwort>> {
        let artikel = artikel.trim();
        if artikel.is_empty() {
            return Ok(None);
        }
        let prompt = format!(
            "Retrieve and provide a simple explanation for Article {artikel} of the Indian Constitution."
        );
        self.send_message(&prompt, false).await
    }

    /// Haengt ein Verfassungs-PDF als Quelle an, gibt den Dateinamen zurueck
    pub async fn attach_pdf(&self, pfad: &Path) -> SessionResult<String> {
        let anhang = pdf_laden(pfad).await?;
        let name = anhang.dateiname.clone();
        self.state.lock().pdf = Some(anhang);
        Ok(name)
    }

    /// Entfernt das PDF, gibt true zurueck wenn eines angehaengt war
    pub fn detach_pdf(&self) -> bool {
        self.state.lock().pdf.take().is_some()
    }

    /// Merkt eine Antwort oder entfernt das Lesezeichen
    pub fn toggle_bookmark(&self, id: &MessageId) -> SessionResult<bool> {
        let gemerkt = self.state.lock().lesezeichen_umschalten(id)?;
        debug!(nachricht = %id, gemerkt, "Lesezeichen umgeschaltet");
        Ok(gemerkt)
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.state.lock().bookmarks.clone()
    }

    /// Alle Lesezeichen als JSON
    pub fn export_bookmarks(&self) -> SessionResult<String> {
        let bookmarks = self.bookmarks();
        Ok(serde_json::to_string_pretty(&bookmarks)?)
    }

    pub fn set_mode(&self, mode: UserMode) {
        self.state.lock().mode = mode;
        info!(modus = %mode, "Modus gewechselt");
    }

    /// Wechselt die Antwortsprache (nur Codes aus der Sprachtabelle)
    pub fn set_language(&self, code: &str) -> SessionResult<&'static Language> {
        let sprache =
            sprache_finden(code).ok_or_else(|| SanvidhanError::UnbekannteSprache(code.to_string()))?;
        self.state.lock().language = sprache.code.to_string();
        info!(sprache = sprache.code, "Sprache gewechselt");
        Ok(sprache)
    }

    /// Schaltet den Dunkelmodus um und gibt den neuen Wert zurueck
    pub fn toggle_theme(&self) -> bool {
        let mut state = self.state.lock();
        state.dark_mode = !state.dark_mode;
        state.dark_mode
    }

    /// Simulierte Zahlung: wartet die konfigurierte Zeit und aktiviert den Plan
    pub async fn simulate_payment(&self, plan: SubscriptionPlan) -> SessionResult<()> {
        if !plan.ist_bezahlt() {
            return Err(SessionError::NichtKaeuflich(plan));
        }
        let Some(_belegung) = Belegung::belegen(&self.loading) else {
            return Err(SessionError::UngueltigeEingabe(
                "Es laeuft bereits eine Anfrage".into(),
            ));
        };

        info!(plan = %plan, "Zahlung wird simuliert");
        tokio::time::sleep(Duration::from_millis(self.config.zahlung_verzoegerung_ms)).await;
        self.state.lock().plan = plan;
        info!(plan = %plan, "Abo aktiviert");
        Ok(())
    }

    /// Liest `text` vor (nur mit bezahltem Abo)
    pub async fn speak(&self, text: &str) -> SessionResult<Sprachausgabe> {
        self.bezahlt_pruefen()?;
        self.voice.speak(text).await
    }

    /// Locale fuer die Spracherkennung (nur mit bezahltem Abo)
    pub fn listen_locale(&self) -> SessionResult<&'static str> {
        self.bezahlt_pruefen()?;
        let state = self.state.lock();
        Ok(if state.language == "hi" { "hi-IN" } else { "en-IN" })
    }

    fn bezahlt_pruefen(&self) -> SessionResult<()> {
        let plan = self.state.lock().plan;
        if plan.ist_bezahlt() {
            Ok(())
        } else {
            Err(SessionError::PlanErforderlich(plan.anzeigename()))
        }
    }

    /// Kopie des aktuellen Zustands
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().messages.clone()
    }

    pub fn plan(&self) -> SubscriptionPlan {
        self.state.lock().plan
    }

    pub fn mode(&self) -> UserMode {
        self.state.lock().mode
    }

    pub fn language(&self) -> String {
        self.state.lock().language.clone()
    }

    pub fn pdf_name(&self) -> Option<String> {
        self.state.lock().pdf.as_ref().map(|p| p.dateiname.clone())
    }

    pub fn fragen_heute(&self) -> u32 {
        self.kontingent.lock().gestellt()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn is_speaking(&self) -> bool {
        self.voice.is_speaking()
    }
}
