//! Gemeinsame Domain-Typen fuer Sanvidhan
//!
//! IDs verwenden das Newtype-Pattern, Modi und Plaene sind geschlossene
//! Enums mit festen Anzeigenamen.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SanvidhanError;

/// Eindeutige Nachrichten-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Erstellt eine neue zufaellige MessageId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = SanvidhanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let roh = s.strip_prefix("msg:").unwrap_or(s);
        Uuid::parse_str(roh)
            .map(Self)
            .map_err(|_| SanvidhanError::UngueltigeEingabe(format!("Ungueltige Nachrichten-ID: {s}")))
    }
}

/// Antwort-Modus des Assistenten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserMode {
    #[default]
    Citizen,
    Student,
    Legal,
}

impl UserMode {
    /// Alle Modi in Anzeigereihenfolge
    pub const ALLE: [UserMode; 3] = [UserMode::Citizen, UserMode::Student, UserMode::Legal];

    /// Anzeigename des Modus
    pub fn anzeigename(&self) -> &'static str {
        match self {
            Self::Citizen => "Citizen",
            Self::Student => "Student",
            Self::Legal => "Legal Awareness",
        }
    }
}

impl std::fmt::Display for UserMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.anzeigename())
    }
}

impl FromStr for UserMode {
    type Err = SanvidhanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "citizen" => Ok(Self::Citizen),
            "student" => Ok(Self::Student),
            "legal" | "legal awareness" => Ok(Self::Legal),
            _ => Err(SanvidhanError::UnbekannterModus(s.to_string())),
        }
    }
}

/// Abo-Plan des Benutzers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Premium,
    StudentInstitution,
}

impl SubscriptionPlan {
    /// Anzeigename des Plans
    pub fn anzeigename(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Premium => "Premium",
            Self::StudentInstitution => "Student/Institution",
        }
    }

    /// Gibt true zurueck fuer alle bezahlten Plaene
    pub fn ist_bezahlt(&self) -> bool {
        !matches!(self, Self::Free)
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.anzeigename())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = SanvidhanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "institutional" | "student" | "student/institution" | "student_institution" => {
                Ok(Self::StudentInstitution)
            }
            _ => Err(SanvidhanError::UnbekannterPlan(s.to_string())),
        }
    }
}

/// Absender einer Nachricht
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rolle {
    User,
    Model,
}

/// Eine Nachricht im Gespraechsverlauf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Rolle,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Nachricht stammt aus der Spracheingabe
    #[serde(default)]
    pub is_voice: bool,
}

impl Message {
    /// Erstellt eine Benutzer-Nachricht
    pub fn user(content: impl Into<String>, is_voice: bool) -> Self {
        Self {
            id: MessageId::new(),
            role: Rolle::User,
            content: content.into(),
            timestamp: Utc::now(),
            is_voice,
        }
    }

    /// Erstellt eine Antwort des Modells
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Rolle::Model,
            content: content.into(),
            timestamp: Utc::now(),
            is_voice: false,
        }
    }
}

/// Ein gemerkter Artikel (aus einer Nachricht uebernommen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Gleich der ID der Quell-Nachricht
    pub id: MessageId,
    pub article_id: String,
    pub title: String,
    pub content: String,
}

/// Eine unterstuetzte Sprache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}
