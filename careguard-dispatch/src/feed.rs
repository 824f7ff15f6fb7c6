//! Caregiver event feed
//!
//! A caregiver sees the events of every linked patient, newest first. The
//! feed is loaded once from the sink and then kept current from a
//! subscription; resolving goes back through the sink.

use careguard_core::SubjectId;

use crate::{
    config::{MonitorConfig, DEFAULT_FEED_LIMIT},
    sink::{EventId, EventSink, StoredEvent, Subscription},
    DispatchError, DispatchResult,
};

/// Note stored on events resolved from the feed
pub const RESOLVED_NOTE: &str = "Resolved by caregiver";

/// Live view of linked patients' emergencies
pub struct CaregiverFeed<S> {
    sink: S,
    patients: Vec<SubjectId>,
    events: Vec<StoredEvent>,
    limit: usize,
    subscription: Option<Subscription>,
}

impl<S: EventSink> CaregiverFeed<S> {
    pub fn new(sink: S, patients: Vec<SubjectId>) -> Self {
        Self::with_limit(sink, patients, DEFAULT_FEED_LIMIT)
    }

    /// Feed loading at most `config.feed_limit` events
    pub fn from_config(sink: S, patients: Vec<SubjectId>, config: &MonitorConfig) -> Self {
        Self::with_limit(sink, patients, config.feed_limit)
    }

    pub fn with_limit(sink: S, patients: Vec<SubjectId>, limit: usize) -> Self {
        Self {
            sink,
            patients,
            events: Vec::new(),
            limit,
            subscription: None,
        }
    }

    /// Load the newest events and start following new ones
    ///
    /// The subscription is opened before the query so nothing published in
    /// between is lost; duplicates are dropped by [`apply`](Self::apply).
    pub async fn load(&mut self) -> DispatchResult<usize> {
        if self.patients.is_empty() {
            self.events.clear();
            return Ok(0);
        }

        self.subscription = Some(self.sink.subscribe(&self.patients));
        self.events = self.sink.query(&self.patients, self.limit).await?;
        log::debug!("feed loaded {} events for {} patients", self.events.len(), self.patients.len());
        Ok(self.events.len())
    }

    /// Add a pushed event to the top of the feed
    ///
    /// Returns `false` for events of other subjects and events already shown.
    pub fn apply(&mut self, event: StoredEvent) -> bool {
        if !self.patients.contains(event.subject_id()) || self.events.iter().any(|e| e.id == event.id) {
            return false;
        }
        self.events.insert(0, event);
        true
    }

    /// Apply every event already pushed, without waiting
    pub fn sync(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(subscription) = self.subscription.as_mut() {
            while let Some(event) = subscription.try_next() {
                pending.push(event);
            }
        }

        let mut added = 0;
        for event in pending {
            if self.apply(event) {
                added += 1;
            }
        }
        added
    }

    /// Wait for the next new event and apply it
    ///
    /// `None` when the feed was never loaded or the sink has gone away.
    pub async fn next_event(&mut self) -> Option<&StoredEvent> {
        loop {
            let event = self.subscription.as_mut()?.next().await?;
            if self.apply(event) {
                return self.events.first();
            }
        }
    }

    /// Mark an event resolved in the sink and in the feed
    pub async fn resolve(&mut self, id: EventId) -> DispatchResult<()> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DispatchError::UnknownEvent(id))?;
        if event.resolved {
            return Ok(());
        }

        self.sink.mark_resolved(id, RESOLVED_NOTE).await?;
        event.resolved = true;
        event.notes = Some(RESOLVED_NOTE.to_string());
        Ok(())
    }

    pub fn events(&self) -> &[StoredEvent] {
        &self.events
    }

    pub fn active(&self) -> impl Iterator<Item = &StoredEvent> {
        self.events.iter().filter(|e| !e.resolved)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn resolved_count(&self) -> usize {
        self.events.iter().filter(|e| e.resolved).count()
    }

    pub fn patients(&self) -> &[SubjectId] {
        &self.patients
    }
}
