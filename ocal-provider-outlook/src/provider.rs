//! [`CalendarProvider`] backed by Microsoft Graph.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use chrono_tz::Tz;
use ocal_core::config::OcalConfig;
use ocal_core::date_range::DateRange;
use ocal_core::error::{OcalError, OcalResult};
use ocal_core::event::{Event, EventPatch};
use ocal_core::provider::CalendarProvider;
use ocal_core::timezone::resolve_timezone;
use url::Url;

use crate::client::GraphClient;
use crate::graph_event::types::EventPage;
use crate::graph_event::{FromGraph, GraphEvent, ToGraph};

/// Calendar id meaning "the user's default calendar".
pub const PRIMARY_CALENDAR: &str = "primary";

#[derive(Debug, Clone)]
pub struct OutlookProvider {
    client: GraphClient,
    calendar_id: Option<String>,
    timezone: Tz,
}

impl OutlookProvider {
    pub fn new(client: GraphClient, calendar_id: Option<String>, timezone: Tz) -> Self {
        let calendar_id = calendar_id.filter(|id| !id.is_empty() && id != PRIMARY_CALENDAR);
        OutlookProvider {
            client,
            calendar_id,
            timezone,
        }
    }

    /// Provider for the configured calendar, URL and timezone.
    pub fn from_config(config: &OcalConfig, token: impl Into<String>) -> OcalResult<Self> {
        let client = GraphClient::new(&config.graph_url, token)?;
        let timezone = resolve_timezone(&config.timezone_name())?;
        Ok(Self::new(client, config.calendar_id.clone(), timezone))
    }

    /// `me/calendar/<rest>` or `me/calendars/<id>/<rest>`.
    fn calendar_url(&self, rest: &[&str]) -> Url {
        let mut segments = match &self.calendar_id {
            None => vec!["me", "calendar"],
            Some(id) => vec!["me", "calendars", id.as_str()],
        };
        segments.extend_from_slice(rest);
        self.client.url(&segments)
    }

    fn event_url(&self, id: &str) -> Url {
        self.calendar_url(&["events", id])
    }

    fn decode(&self, event: GraphEvent) -> OcalResult<Event> {
        Event::from_graph(event, &self.timezone)
    }
}

/// Report a 404 against the event id that was asked for.
fn not_found_as(id: &str) -> impl FnOnce(OcalError) -> OcalError + '_ {
    move |e| match e {
        OcalError::EventNotFound(_) => OcalError::EventNotFound(id.to_string()),
        other => other,
    }
}

#[async_trait]
impl CalendarProvider for OutlookProvider {
    fn timezone(&self) -> Tz {
        self.timezone
    }

    async fn agenda(&self, range: &DateRange, query: Option<&str>) -> OcalResult<Vec<Event>> {
        let mut url = self.calendar_url(&["calendarView"]);
        url.query_pairs_mut()
            .append_pair(
                "startDateTime",
                &range.start.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair(
                "endDateTime",
                &range.end.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair("$orderby", "start/dateTime");

        let mut events = Vec::new();
        let mut next = Some(url);

        while let Some(page_url) = next.take() {
            let page: EventPage = self.client.get(page_url).await?;

            for graph_event in page.value {
                let id = graph_event.id.clone();
                match self.decode(graph_event) {
                    Ok(event) => events.push(event),
                    Err(e) => tracing::warn!(?id, error = %e, "skipping undecodable event"),
                }
            }

            next = match page.next_link {
                Some(link) => Some(
                    Url::parse(&link)
                        .map_err(|e| OcalError::WireFormat(format!("Invalid nextLink: {e}")))?,
                ),
                None => None,
            };
        }

        if let Some(query) = query {
            events.retain(|event| event.matches(query));
        }
        events.sort_by_key(|event| event.start);

        tracing::debug!(count = events.len(), "fetched agenda");
        Ok(events)
    }

    async fn get(&self, id: &str) -> OcalResult<Event> {
        let graph_event: GraphEvent = self
            .client
            .get(self.event_url(id))
            .await
            .map_err(not_found_as(id))?;
        self.decode(graph_event)
    }

    async fn add(&self, event: &Event) -> OcalResult<String> {
        event.validate()?;
        let created: GraphEvent = self
            .client
            .post(self.calendar_url(&["events"]), &event.to_graph())
            .await?;

        created
            .id
            .ok_or_else(|| OcalError::WireFormat("Created event has no id".into()))
    }

    async fn edit(&self, id: &str, patch: &EventPatch) -> OcalResult<Event> {
        if patch.is_empty() {
            return Err(OcalError::InvalidEvent("No changes specified".into()));
        }
        patch.validate()?;

        let updated: GraphEvent = self
            .client
            .patch(self.event_url(id), &patch.to_graph())
            .await
            .map_err(not_found_as(id))?;
        self.decode(updated)
    }

    async fn delete(&self, id: &str) -> OcalResult<()> {
        self.client
            .delete(self.event_url(id))
            .await
            .map_err(not_found_as(id))
    }
}
