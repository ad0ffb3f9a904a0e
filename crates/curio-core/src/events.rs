//! Append-only event history for repository objects.
//!
//! Every state-changing operation on an object (embargo release, rights
//! reassignment, publication) records an [`Event`] so downstream auditing
//! can reconstruct what happened and who did it. Events are immutable once
//! recorded and carry a UTC timestamp assigned at append time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in an object's event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Tag grouping related events (e.g. `embargo`, `publish`).
    pub event_type: String,
    /// Who or what triggered the event (e.g. `application:embargo-release`).
    pub who: String,
    /// When the event was recorded (UTC).
    pub when: DateTime<Utc>,
    /// What happened.
    pub message: String,
}

/// An object's append-only event history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event, stamping it with the current UTC time.
    pub fn add_event(
        &mut self,
        event_type: impl Into<String>,
        who: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.events.push(Event {
            event_type: event_type.into(),
            who: who.into(),
            when: Utc::now(),
            message: message.into(),
        });
    }

    /// Iterates over events with the given type tag, oldest first.
    pub fn events_of_type<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.event_type == tag)
    }

    /// Iterates over all events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_with_timestamps() {
        let mut log = EventLog::new();
        let before = Utc::now();
        log.add_event("embargo", "application:embargo-release", "Embargo released");
        let after = Utc::now();

        assert_eq!(log.len(), 1);
        let event = log.iter().next().unwrap();
        assert_eq!(event.event_type, "embargo");
        assert_eq!(event.who, "application:embargo-release");
        assert_eq!(event.message, "Embargo released");
        assert!(event.when >= before && event.when <= after);
    }

    #[test]
    fn filters_by_type() {
        let mut log = EventLog::new();
        log.add_event("embargo", "app", "Embargo released");
        log.add_event("publish", "app", "Published");
        log.add_event("embargo", "app", "Embargo updated");

        let embargo_events: Vec<_> = log.events_of_type("embargo").collect();
        assert_eq!(embargo_events.len(), 2);
        assert!(embargo_events.iter().all(|e| e.event_type == "embargo"));
        assert_eq!(log.events_of_type("shelve").count(), 0);
    }

    #[test]
    fn serde_roundtrip() {
        let mut log = EventLog::new();
        log.add_event("embargo", "app", "Embargo released");
        let json = serde_json::to_string(&log).unwrap();
        let back: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(log, back);
    }
}
