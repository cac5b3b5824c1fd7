//! Remote calendar access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::clock::{Clock, FixedClock, SystemClock};
use crate::date_range::{DEFAULT_SEARCH_DAYS, DateRange};
use crate::error::OcalResult;
use crate::event::{Event, EventPatch};
use crate::ics::parse_ics_events;

/// A calendar backend. Implementations own their transport and credentials.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Timezone events are expressed in when the remote does not say.
    fn timezone(&self) -> Tz;

    fn now(&self) -> DateTime<Utc> {
        SystemClock.now()
    }

    /// Events overlapping `range`, ordered by start; `query` filters on
    /// title, location and body.
    async fn agenda(&self, range: &DateRange, query: Option<&str>) -> OcalResult<Vec<Event>>;

    async fn get(&self, id: &str) -> OcalResult<Event>;

    /// Create `event`, returning the identifier the remote assigned.
    async fn add(&self, event: &Event) -> OcalResult<String>;

    async fn edit(&self, id: &str, patch: &EventPatch) -> OcalResult<Event>;

    async fn delete(&self, id: &str) -> OcalResult<()>;

    /// Search `range`, or the next DEFAULT_SEARCH_DAYS days.
    async fn search(&self, query: &str, range: Option<&DateRange>) -> OcalResult<Vec<Event>> {
        match range {
            Some(range) => self.agenda(range, Some(query)).await,
            None => {
                let clock = FixedClock(self.now());
                let range = DateRange::upcoming(DEFAULT_SEARCH_DAYS, &self.timezone(), &clock);
                self.agenda(&range, Some(query)).await
            }
        }
    }

    /// Add every event of an ICS document, returning how many were created.
    ///
    /// A failed event is logged and does not stop the import.
    async fn import_ics(&self, content: &str) -> OcalResult<usize> {
        let events = parse_ics_events(content, &self.timezone())?;
        let mut imported = 0;

        for event in &events {
            match self.add(event).await {
                Ok(id) => {
                    tracing::debug!(%id, title = %event, "imported event");
                    imported += 1;
                }
                Err(e) => tracing::warn!(title = %event, error = %e, "failed to import event"),
            }
        }

        Ok(imported)
    }
}
