//! Sitzungszustand: Verlauf, Einstellungen, Lesezeichen, PDF-Anhang

use sanvidhan_core::{sprache_finden, Bookmark, Message, MessageId, Rolle, SubscriptionPlan, UserMode};
use serde::Serialize;

use crate::config::SitzungConfig;
use crate::error::{SessionError, SessionResult};

/// Begruessung des Assistenten beim Start
pub const BEGRUESSUNG: &str = "Namaste! I am Sanvidhan AI, your constitutional companion. How can I help you understand the laws and rights that govern our nation today?";

/// Antwort bei fehlgeschlagener Anfrage an den Chat-Dienst
pub const VERBINDUNGSFEHLER: &str =
    "I'm having trouble connecting. Please check your network or API configuration.";

/// Zeichen der Nachricht, die als Lesezeichen-Titel dienen
const TITEL_ZEICHEN: usize = 30;

/// Hochgeladenes Verfassungs-PDF
#[derive(Debug, Clone, PartialEq)]
pub struct PdfAnhang {
    pub dateiname: String,
    /// Base64-kodierter Dateiinhalt
    pub base64: String,
}

/// Zustand einer Sitzung
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub mode: UserMode,
    pub language: String,
    pub plan: SubscriptionPlan,
    pub dark_mode: bool,
    pub bookmarks: Vec<Bookmark>,
    #[serde(skip)]
    pub pdf: Option<PdfAnhang>,
}

impl SessionState {
    /// Startzustand mit Begruessung. Sprache wird gegen die Tabelle geprueft.
    pub fn neu(config: &SitzungConfig) -> SessionResult<Self> {
        let sprache = sprache_finden(&config.sprache)
            .ok_or_else(|| sanvidhan_core::SanvidhanError::UnbekannteSprache(config.sprache.clone()))?;

        Ok(Self {
            messages: vec![Message::model(BEGRUESSUNG)],
            mode: config.modus,
            language: sprache.code.to_string(),
            plan: SubscriptionPlan::Free,
            dark_mode: config.dunkelmodus,
            bookmarks: Vec::new(),
            pdf: None,
        })
    }

    pub fn nachricht(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn ist_gemerkt(&self, id: &MessageId) -> bool {
        self.bookmarks.iter().any(|b| &b.id == id)
    }

    /// Merkt eine Antwort oder entfernt das bestehende Lesezeichen.
    ///
    /// Gibt true zurueck wenn das Lesezeichen danach existiert.
    pub fn lesezeichen_umschalten(&mut self, id: &MessageId) -> SessionResult<bool> {
        if self.ist_gemerkt(id) {
            self.bookmarks.retain(|b| &b.id != id);
            return Ok(false);
        }

        let nachricht = self
            .nachricht(id)
            .ok_or_else(|| SessionError::NachrichtNichtGefunden(id.to_string()))?;
        if nachricht.role != Rolle::Model {
            return Err(SessionError::UngueltigeEingabe(
                "Nur Antworten koennen gemerkt werden".into(),
            ));
        }

        let bookmark = lesezeichen_aus(nachricht);
        self.bookmarks.push(bookmark);
        Ok(true)
    }
}

/// Baut ein Lesezeichen aus einer Nachricht
pub fn lesezeichen_aus(nachricht: &Message) -> Bookmark {
    let anfang: String = nachricht.content.chars().take(TITEL_ZEICHEN).collect();
    Bookmark {
        id: nachricht.id,
        article_id: "Extracted".into(),
        title: format!("{anfang}..."),
        content: nachricht.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zustand() -> SessionState {
        SessionState::neu(&SitzungConfig::default()).unwrap()
    }

    #[test]
    fn startet_mit_begruessung() {
        let s = zustand();
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].role, Rolle::Model);
        assert_eq!(s.messages[0].content, BEGRUESSUNG);
        assert_eq!(s.plan, SubscriptionPlan::Free);
        assert_eq!(s.language, "en");
    }

    #[test]
    fn unbekannte_sprache_abgelehnt() {
        let cfg = SitzungConfig {
            sprache: "xx".into(),
            ..Default::default()
        };
        assert!(matches!(SessionState::neu(&cfg), Err(SessionError::Domain(_))));
    }

    #[test]
    fn titel_aus_ersten_30_zeichen() {
        let m = Message::model("Article 21: Protection of life and personal liberty");
        let b = lesezeichen_aus(&m);
        assert_eq!(b.title, "Article 21: Protection of life...");
        assert_eq!(b.article_id, "Extracted");
        assert_eq!(b.id, m.id);
        assert_eq!(b.content, m.content);
    }

    #[test]
    fn titel_kurzer_nachricht() {
        let b = lesezeichen_aus(&Message::model("Kurz"));
        assert_eq!(b.title, "Kurz...");
    }

    #[test]
    fn titel_zaehlt_zeichen_nicht_bytes() {
        let text = "अनुच्छेद".repeat(10);
        let b = lesezeichen_aus(&Message::model(text.clone()));
        assert_eq!(b.title.chars().count(), 33);
    }

    #[test]
    fn lesezeichen_umschalten() {
        let mut s = zustand();
        let id = s.messages[0].id;
        assert!(s.lesezeichen_umschalten(&id).unwrap());
        assert_eq!(s.bookmarks.len(), 1);
        assert!(!s.lesezeichen_umschalten(&id).unwrap());
        assert!(s.bookmarks.is_empty());
    }

    #[test]
    fn lesezeichen_nur_fuer_antworten() {
        let mut s = zustand();
        let frage = Message::user("Article 14?", false);
        let id = frage.id;
        s.messages.push(frage);
        assert!(matches!(
            s.lesezeichen_umschalten(&id),
            Err(SessionError::UngueltigeEingabe(_))
        ));
        assert!(matches!(
            s.lesezeichen_umschalten(&MessageId::new()),
            Err(SessionError::NachrichtNichtGefunden(_))
        ));
    }
}
