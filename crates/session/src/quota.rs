//! Tageskontingent fuer Fragen im Free-Plan

use chrono::NaiveDate;
use sanvidhan_core::SubscriptionPlan;

use crate::error::{SessionError, SessionResult};

/// Zaehlt die gestellten Fragen eines Kalendertags
#[derive(Debug, Clone, Default)]
pub struct Tageskontingent {
    tag: Option<NaiveDate>,
    gestellt: u32,
}

impl Tageskontingent {
    /// Prueft das Kontingent und zaehlt bei Erfolg eine Frage.
    ///
    /// Bezahlte Plaene und `max == 0` sind unbegrenzt. Ein neuer Tag setzt
    /// den Zaehler zurueck.
    pub fn beanspruchen(
        &mut self,
        plan: SubscriptionPlan,
        max: u32,
        heute: NaiveDate,
    ) -> SessionResult<()> {
        if plan.ist_bezahlt() || max == 0 {
            return Ok(());
        }

        if self.tag != Some(heute) {
            self.tag = Some(heute);
            self.gestellt = 0;
        }

        if self.gestellt >= max {
            return Err(SessionError::KontingentErschoepft {
                gestellt: self.gestellt,
                max,
            });
        }

        self.gestellt += 1;
        Ok(())
    }

    /// Gibt eine Frage zurueck, die nicht gestellt werden konnte
    pub fn freigeben(&mut self) {
        self.gestellt = self.gestellt.saturating_sub(1);
    }

    pub fn gestellt(&self) -> u32 {
        self.gestellt
    }
}
