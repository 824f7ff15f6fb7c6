//! In-memory event store
//!
//! Append-only tables behind a single mutex plus a broadcast channel for
//! inserts. Used by tests, demos and single-process deployments.

use std::sync::{Mutex, MutexGuard};

use careguard_core::{EscalationEvent, SubjectId};
use tokio::sync::broadcast;

use crate::{
    config::MonitorConfig,
    session::Accessibility,
    sink::{EventId, EventSink, FallRecord, HealthLog, StoredEvent, Subscription},
    DispatchError, DispatchResult,
};

/// Default number of inserts a slow subscriber may fall behind
pub const DEFAULT_BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct Tables {
    events: Vec<StoredEvent>,
    falls: Vec<FallRecord>,
    health: Vec<HealthLog>,
    next_id: u64,
}

/// [`EventSink`] backed by process memory
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    inserts: broadcast::Sender<StoredEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

impl MemoryStore {
    pub fn new(broadcast_capacity: usize) -> Self {
        let (inserts, _) = broadcast::channel(broadcast_capacity.max(1));
        Self {
            tables: Mutex::new(Tables::default()),
            inserts,
        }
    }

    /// Store sized by the configured broadcast capacity
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.broadcast_capacity)
    }

    // A panic while holding the lock cannot leave a half-written row.
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn event(&self, id: EventId) -> Option<StoredEvent> {
        self.tables().events.iter().find(|e| e.id == id).cloned()
    }

    pub fn event_count(&self) -> usize {
        self.tables().events.len()
    }

    pub fn falls(&self) -> Vec<FallRecord> {
        self.tables().falls.clone()
    }

    pub fn health_logs(&self) -> Vec<HealthLog> {
        self.tables().health.clone()
    }
}

#[async_trait::async_trait]
impl EventSink for MemoryStore {
    async fn publish(&self, event: EscalationEvent, accessibility: Accessibility) -> DispatchResult<EventId> {
        let stored = {
            let mut tables = self.tables();
            tables.next_id += 1;
            let stored = StoredEvent::new(EventId(tables.next_id), event, accessibility);
            tables.events.push(stored.clone());
            stored
        };

        let id = stored.id;
        // no receivers is fine
        let _ = self.inserts.send(stored);
        Ok(id)
    }

    async fn record_fall(&self, record: FallRecord) -> DispatchResult<()> {
        self.tables().falls.push(record);
        Ok(())
    }

    async fn log_health(&self, log: HealthLog) -> DispatchResult<()> {
        self.tables().health.push(log);
        Ok(())
    }

    async fn mark_resolved(&self, id: EventId, note: &str) -> DispatchResult<()> {
        let mut tables = self.tables();
        let event = tables
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DispatchError::UnknownEvent(id))?;

        if !event.resolved {
            event.resolved = true;
            event.notes = Some(note.to_string());
        }
        Ok(())
    }

    async fn query(&self, subjects: &[SubjectId], limit: usize) -> DispatchResult<Vec<StoredEvent>> {
        let tables = self.tables();
        let mut matching: Vec<StoredEvent> = tables
            .events
            .iter()
            .rev()
            .filter(|e| subjects.contains(e.subject_id()))
            .cloned()
            .collect();

        // stable: equal timestamps keep newest-inserted first
        matching.sort_by(|a, b| b.event.timestamp().cmp(&a.event.timestamp()));
        matching.truncate(limit);
        Ok(matching)
    }

    fn subscribe(&self, subjects: &[SubjectId]) -> Subscription {
        Subscription::new(self.inserts.subscribe(), subjects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careguard_core::{Escalation, EscalationKind, HeartRate};

    fn event(subject: &str, kind: EscalationKind, at: u64) -> EscalationEvent {
        EscalationEvent::new(
            Escalation::new(kind, at),
            SubjectId::new(subject).unwrap(),
            HeartRate::default(),
            at,
        )
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = MemoryStore::default();
        let a = store.publish(event("p-1", EscalationKind::ManualSos, 0), Accessibility::None).await.unwrap();
        let b = store.publish(event("p-1", EscalationKind::ManualSos, 1), Accessibility::None).await.unwrap();
        assert!(a < b);
        assert_eq!(store.event_count(), 2);
    }

    #[tokio::test]
    async fn query_is_newest_first_and_filtered() {
        let store = MemoryStore::default();
        for (subject, at) in [("p-1", 10), ("p-2", 20), ("p-1", 30), ("p-3", 40)] {
            store.publish(event(subject, EscalationKind::ManualSos, at), Accessibility::None).await.unwrap();
        }

        let subjects = [SubjectId::new("p-1").unwrap(), SubjectId::new("p-2").unwrap()];
        let events = store.query(&subjects, 100).await.unwrap();
        let stamps: Vec<_> = events.iter().map(|e| e.event.timestamp()).collect();
        assert_eq!(stamps, vec![30, 20, 10]);

        let limited = store.query(&subjects, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].event.timestamp(), 30);
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let store = MemoryStore::default();
        let id = store.publish(event("p-1", EscalationKind::FallDetected, 0), Accessibility::None).await.unwrap();

        store.mark_resolved(id, "first").await.unwrap();
        store.mark_resolved(id, "second").await.unwrap();

        let stored = store.event(id).unwrap();
        assert!(stored.resolved);
        assert_eq!(stored.notes.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn resolve_unknown_event() {
        let store = MemoryStore::default();
        let err = store.mark_resolved(EventId(9), "x").await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownEvent(EventId(9))));
    }

    #[tokio::test]
    async fn subscription_filters_by_subject() {
        let store = MemoryStore::default();
        let mut feed = store.subscribe(&[SubjectId::new("p-1").unwrap()]);

        store.publish(event("p-2", EscalationKind::ManualSos, 0), Accessibility::None).await.unwrap();
        store.publish(event("p-1", EscalationKind::VoiceEmergency, 1), Accessibility::None).await.unwrap();

        let pushed = feed.next().await.unwrap();
        assert_eq!(pushed.event.kind(), EscalationKind::VoiceEmergency);
        assert!(feed.try_next().is_none());
    }

    #[tokio::test]
    async fn keeps_the_patient_accessibility() {
        let store = MemoryStore::default();
        let id = store
            .publish(event("p-1", EscalationKind::GestureEmergency, 0), Accessibility::Mute)
            .await
            .unwrap();

        assert_eq!(store.event(id).unwrap().accessibility, Accessibility::Mute);
        let queried = store.query(&[SubjectId::new("p-1").unwrap()], 1).await.unwrap();
        assert_eq!(queried[0].accessibility, Accessibility::Mute);
    }

    #[tokio::test]
    async fn configured_capacity_bounds_the_backlog() {
        let config = MonitorConfig {
            broadcast_capacity: 1,
            ..MonitorConfig::default()
        };
        let store = MemoryStore::from_config(&config);
        let mut feed = store.subscribe(&[SubjectId::new("p-1").unwrap()]);

        for at in 0..3 {
            store.publish(event("p-1", EscalationKind::ManualSos, at), Accessibility::None).await.unwrap();
        }

        assert_eq!(feed.try_next().map(|e| e.event.timestamp()), Some(2));
        assert!(feed.try_next().is_none());
    }

    #[tokio::test]
    async fn lagged_subscriber_skips_ahead() {
        let store = MemoryStore::new(2);
        let mut feed = store.subscribe(&[SubjectId::new("p-1").unwrap()]);

        for at in 0..5 {
            store.publish(event("p-1", EscalationKind::ManualSos, at), Accessibility::None).await.unwrap();
        }

        // only the last two survive in the channel
        assert_eq!(feed.try_next().map(|e| e.event.timestamp()), Some(3));
        assert_eq!(feed.try_next().map(|e| e.event.timestamp()), Some(4));
        assert!(feed.try_next().is_none());
    }
}
