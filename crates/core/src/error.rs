//! Fehlertypen fuer Sanvidhan
//!
//! Zentraler Fehler-Enum fuer die gemeinsamen Domain-Typen.
//! Untermodule koennen eigene Fehler definieren und via `#[from]` konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer Sanvidhan
pub type Result<T> = std::result::Result<T, SanvidhanError>;

/// Fehler beim Umgang mit den Domain-Typen
#[derive(Debug, Error)]
pub enum SanvidhanError {
    #[error("Unbekannter Modus: {0}")]
    UnbekannterModus(String),

    #[error("Unbekannter Abo-Plan: {0}")]
    UnbekannterPlan(String),

    #[error("Nicht unterstuetzte Sprache: {0}")]
    UnbekannteSprache(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl SanvidhanError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler auf eine Benutzereingabe zurueckgeht
    pub fn ist_eingabefehler(&self) -> bool {
        matches!(
            self,
            Self::UnbekannterModus(_)
                | Self::UnbekannterPlan(_)
                | Self::UnbekannteSprache(_)
                | Self::UngueltigeEingabe(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = SanvidhanError::UnbekannteSprache("xx".into());
        assert_eq!(e.to_string(), "Nicht unterstuetzte Sprache: xx");
    }

    #[test]
    fn eingabefehler_erkennung() {
        assert!(SanvidhanError::UnbekannterModus("test".into()).ist_eingabefehler());
        assert!(!SanvidhanError::intern("kaputt").ist_eingabefehler());
    }
}
