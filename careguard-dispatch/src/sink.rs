//! Event sink boundary
//!
//! The sink is the system of record for emergencies, fall records and
//! health logs. Anything that can store rows and push inserts can implement
//! [`EventSink`]; [`crate::store::MemoryStore`] is the in-process version.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use careguard_core::{
    time::Timestamp,
    vitals::{HeartRate, VitalStatus},
    EscalationEvent, SubjectId,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::{session::Accessibility, DispatchResult};

/// Location noted on automatically recorded falls
pub const DEFAULT_FALL_LOCATION: &str = "Home";

/// Sink-assigned identifier of a stored event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt-{}", self.0)
    }
}

/// An emergency as the sink stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: EventId,
    pub event: EscalationEvent,
    /// Profile of the patient when the event was raised, so responders know
    /// how to reach them
    pub accessibility: Accessibility,
    pub resolved: bool,
    pub notes: Option<String>,
}

impl StoredEvent {
    pub fn new(id: EventId, event: EscalationEvent, accessibility: Accessibility) -> Self {
        Self {
            id,
            event,
            accessibility,
            resolved: false,
            notes: None,
        }
    }

    pub fn subject_id(&self) -> &SubjectId {
        self.event.subject_id()
    }
}

/// Fall awaiting confirmation by a caregiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallRecord {
    pub subject_id: SubjectId,
    pub confirmed: bool,
    pub location_note: String,
    pub recorded_at: Timestamp,
}

impl FallRecord {
    pub fn unconfirmed(subject_id: SubjectId, recorded_at: Timestamp) -> Self {
        Self {
            subject_id,
            confirmed: false,
            location_note: DEFAULT_FALL_LOCATION.to_string(),
            recorded_at,
        }
    }
}

/// One heart-rate reading with its display status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthLog {
    pub subject_id: SubjectId,
    pub heart_rate: HeartRate,
    pub status: VitalStatus,
    pub recorded_at: Timestamp,
}

impl HealthLog {
    pub fn new(subject_id: SubjectId, heart_rate: HeartRate, recorded_at: Timestamp) -> Self {
        Self {
            subject_id,
            status: heart_rate.status(),
            heart_rate,
            recorded_at,
        }
    }
}

/// Storage and push delivery for emergencies
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    /// Append an event and push it to matching subscribers
    async fn publish(&self, event: EscalationEvent, accessibility: Accessibility) -> DispatchResult<EventId>;

    /// Append an unconfirmed fall record
    async fn record_fall(&self, record: FallRecord) -> DispatchResult<()>;

    /// Append a heart-rate log entry
    async fn log_health(&self, log: HealthLog) -> DispatchResult<()>;

    /// Mark an event resolved
    ///
    /// Resolving an already resolved event succeeds and changes nothing.
    async fn mark_resolved(&self, id: EventId, note: &str) -> DispatchResult<()>;

    /// Events for any of `subjects`, newest first, at most `limit`
    async fn query(&self, subjects: &[SubjectId], limit: usize) -> DispatchResult<Vec<StoredEvent>>;

    /// Live feed of events published for any of `subjects`
    fn subscribe(&self, subjects: &[SubjectId]) -> Subscription;
}

#[async_trait::async_trait]
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    async fn publish(&self, event: EscalationEvent, accessibility: Accessibility) -> DispatchResult<EventId> {
        (**self).publish(event, accessibility).await
    }

    async fn record_fall(&self, record: FallRecord) -> DispatchResult<()> {
        (**self).record_fall(record).await
    }

    async fn log_health(&self, log: HealthLog) -> DispatchResult<()> {
        (**self).log_health(log).await
    }

    async fn mark_resolved(&self, id: EventId, note: &str) -> DispatchResult<()> {
        (**self).mark_resolved(id, note).await
    }

    async fn query(&self, subjects: &[SubjectId], limit: usize) -> DispatchResult<Vec<StoredEvent>> {
        (**self).query(subjects, limit).await
    }

    fn subscribe(&self, subjects: &[SubjectId]) -> Subscription {
        (**self).subscribe(subjects)
    }
}

/// Receiving end of a subject-filtered event feed
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<StoredEvent>,
    subjects: HashSet<SubjectId>,
}

impl Subscription {
    pub fn new(receiver: broadcast::Receiver<StoredEvent>, subjects: &[SubjectId]) -> Self {
        Self {
            receiver,
            subjects: subjects.iter().cloned().collect(),
        }
    }

    fn wants(&self, event: &StoredEvent) -> bool {
        self.subjects.contains(event.subject_id())
    }

    /// Wait for the next matching event, `None` once the sink is gone
    pub async fn next(&mut self) -> Option<StoredEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event already delivered, without waiting
    pub fn try_next(&mut self) -> Option<StoredEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("subscriber lagged, skipped {} events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
