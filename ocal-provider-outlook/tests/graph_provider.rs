//! Outlook provider integration tests against a mocked Graph API.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use ocal_core::{CalendarProvider, DateRange, Event, EventPatch, FixedClock, OcalError};
use ocal_provider_outlook::{GraphClient, OutlookProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DUBLIN: Tz = Tz::Europe__Dublin;

fn provider(server: &MockServer, calendar_id: Option<&str>) -> OutlookProvider {
    let client = GraphClient::new(&format!("{}/v1.0", server.uri()), "secret-token")
        .expect("Failed to create client");
    OutlookProvider::new(client, calendar_id.map(String::from), DUBLIN)
}

fn week_of_july_first() -> DateRange {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap());
    DateRange::parse(Some("2025-07-01"), Some("2025-07-07"), &DUBLIN, &clock).unwrap()
}

fn graph_event(id: &str, subject: &str, start: &str, end: &str) -> serde_json::Value {
    json!({
        "id": id,
        "subject": subject,
        "body": {"contentType": "html", "content": ""},
        "location": {"displayName": ""},
        "start": {"dateTime": start, "timeZone": "UTC"},
        "end": {"dateTime": end, "timeZone": "UTC"},
        "isAllDay": false,
        "attendees": [],
        "isReminderOn": false
    })
}

#[tokio::test]
async fn agenda_follows_pages_and_sorts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendar/calendarView"))
        .and(query_param("startDateTime", "2025-06-30T23:00:00Z"))
        .and(query_param("endDateTime", "2025-07-07T22:59:59Z"))
        .and(query_param("$orderby", "start/dateTime"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(header("Prefer", "outlook.timezone=\"UTC\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [graph_event(
                "b", "Review", "2025-07-02T14:00:00.0000000", "2025-07-02T15:00:00.0000000"
            )],
            "@odata.nextLink": format!("{}/v1.0/page2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                graph_event("a", "Standup", "2025-07-01T08:00:00.0000000", "2025-07-01T08:15:00.0000000"),
                {"id": "broken", "subject": "No times"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let events = provider(&server, None)
        .agenda(&week_of_july_first(), None)
        .await
        .expect("Failed to fetch agenda");

    let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Standup", "Review"]);
    assert_eq!(events[0].id.as_deref(), Some("a"));
    assert_eq!(events[0].start, DUBLIN.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap());
    assert_eq!(events[0].location, None);
    assert_eq!(events[0].body, None);
}

#[tokio::test]
async fn agenda_filters_by_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendars/work/calendarView"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                graph_event("a", "Standup", "2025-07-01T08:00:00", "2025-07-01T08:15:00"),
                graph_event("b", "Lunch with Sam", "2025-07-01T12:00:00", "2025-07-01T13:00:00")
            ]
        })))
        .mount(&server)
        .await;

    let events = provider(&server, Some("work"))
        .agenda(&week_of_july_first(), Some("LUNCH"))
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Lunch with Sam");
}

#[tokio::test]
async fn get_maps_not_found_to_event_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendar/events/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ErrorItemNotFound", "message": "The specified object was not found in the store."}
        })))
        .mount(&server)
        .await;

    match provider(&server, None).get("missing").await {
        Err(OcalError::EventNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected EventNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn error_statuses_are_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendar/events/expired"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "InvalidAuthenticationToken", "message": "Access token has expired."}
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1.0/me/calendar/events/busy"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let provider = provider(&server, None);

    match provider.get("expired").await {
        Err(OcalError::Authentication(message)) => {
            assert!(message.contains("Access token has expired."))
        }
        other => panic!("expected Authentication, got {other:?}"),
    }

    match provider.delete("busy").await {
        Err(OcalError::Api(message)) => assert_eq!(message, "503 - Unknown error"),
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn add_posts_event_and_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/me/calendar/events"))
        .and(body_partial_json(json!({
            "subject": "Coffee",
            "location": {"displayName": "Cafe Nero"},
            "start": {"dateTime": "2025-07-01T16:00:00", "timeZone": "Europe/Dublin"},
            "end": {"dateTime": "2025-07-01T16:30:00", "timeZone": "Europe/Dublin"},
            "isAllDay": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "AAMkNew"})))
        .expect(1)
        .mount(&server)
        .await;

    let event = Event::new(
        "Coffee",
        DUBLIN.with_ymd_and_hms(2025, 7, 1, 16, 0, 0).unwrap(),
        DUBLIN.with_ymd_and_hms(2025, 7, 1, 16, 30, 0).unwrap(),
    )
    .unwrap()
    .with_location(Some("Cafe Nero".into()));

    let id = provider(&server, None).add(&event).await.unwrap();
    assert_eq!(id, "AAMkNew");
}

#[tokio::test]
async fn add_without_returned_id_is_a_wire_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/me/calendar/events"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .mount(&server)
        .await;

    let event = Event::new(
        "Coffee",
        DUBLIN.with_ymd_and_hms(2025, 7, 1, 16, 0, 0).unwrap(),
        DUBLIN.with_ymd_and_hms(2025, 7, 1, 16, 30, 0).unwrap(),
    )
    .unwrap();

    assert!(matches!(
        provider(&server, None).add(&event).await,
        Err(OcalError::WireFormat(_))
    ));
}

#[tokio::test]
async fn edit_patches_only_changed_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1.0/me/calendar/events/abc"))
        .and(body_partial_json(json!({"subject": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(graph_event(
            "abc",
            "Renamed",
            "2025-07-01T08:00:00",
            "2025-07-01T09:00:00",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server, None);
    let patch = EventPatch {
        title: Some("Renamed".into()),
        ..Default::default()
    };
    let updated = provider.edit("abc", &patch).await.unwrap();
    assert_eq!(updated.title, "Renamed");

    assert!(matches!(
        provider.edit("abc", &EventPatch::default()).await,
        Err(OcalError::InvalidEvent(_))
    ));
}

#[tokio::test]
async fn delete_removes_event() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1.0/me/calendar/events/abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server, None).delete("abc").await.unwrap();
}

#[tokio::test]
async fn import_creates_each_vevent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/me/calendar/events"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "x"})))
        .expect(2)
        .mount(&server)
        .await;

    let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:1\r\n\
SUMMARY:One\r\n\
DTSTART:20250701T090000Z\r\n\
DTEND:20250701T100000Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:2\r\n\
SUMMARY:Two\r\n\
DTSTART;VALUE=DATE:20250704\r\n\
DTEND;VALUE=DATE:20250705\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    let created = provider(&server, None).import_ics(ics).await.unwrap();
    assert_eq!(created, 2);
}
