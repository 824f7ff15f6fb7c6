//! Escalation dispatch
//!
//! Turns a detector's [`Escalation`] into an [`EscalationEvent`] and hands
//! it to the sink exactly once. Risk comes from
//! [`careguard_core::RiskLevel::classify`] and nothing else.

use careguard_core::{time::Timestamp, Escalation, EscalationEvent, EscalationKind};

use crate::{
    session::Session,
    sink::{EventId, EventSink, FallRecord},
    DispatchError, DispatchResult,
};

/// Publishes escalations for the session's patient
#[derive(Debug)]
pub struct Dispatcher<S> {
    sink: S,
}

impl<S: EventSink> Dispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Classify, stamp and publish one escalation
    ///
    /// Falls additionally get an unconfirmed fall record. The event is
    /// already stored when that append runs, so a failure there is logged
    /// and does not fail the dispatch.
    pub async fn dispatch(
        &self,
        escalation: Escalation,
        session: &Session,
        now: Timestamp,
    ) -> DispatchResult<EventId> {
        if !session.profile().is_patient() {
            return Err(DispatchError::NotAPatient);
        }

        let subject = session.subject_id().clone();
        let event = EscalationEvent::new(escalation, subject.clone(), session.heart_rate(), now);
        let (kind, risk, heart_rate) = (event.kind(), event.risk_level(), event.heart_rate_at_trigger());

        let id = self.sink.publish(event, session.profile().accessibility).await?;
        log::info!("{} [{}] for {} at {} ({}) -> {}", kind, risk, subject, now, heart_rate, id);

        if kind == EscalationKind::FallDetected {
            if let Err(e) = self.sink.record_fall(FallRecord::unconfirmed(subject, now)).await {
                log::warn!("fall record for {} not stored: {}", id, e);
            }
        }

        Ok(id)
    }
}
