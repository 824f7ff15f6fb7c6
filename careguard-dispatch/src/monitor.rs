//! Per-patient monitor wiring
//!
//! One monitor per patient owns every piece of per-subject state: the
//! motion classifier, the heart-rate escalator, the sensor watch and the
//! session. Each input is processed to completion before the next, so no
//! detector state is ever shared.

use careguard_core::{
    motion::{MotionReadout, SensorStatus, SensorWatch},
    time::{TimeSource, Timestamp},
    AccelSample, Escalation, EscalationKind, HeartRate, HeartRateEscalator, MotionClassifier,
};

use crate::{
    config::MonitorConfig,
    dispatcher::Dispatcher,
    session::Session,
    sink::{EventId, EventSink, HealthLog},
    DispatchError, DispatchResult,
};

/// Detectors and dispatch for one patient
pub struct PatientMonitor<S, C> {
    motion: MotionClassifier,
    vitals: HeartRateEscalator,
    sensor: SensorWatch,
    dispatcher: Dispatcher<S>,
    session: Session,
    clock: C,
}

impl<S: EventSink, C: TimeSource> PatientMonitor<S, C> {
    pub fn new(session: Session, sink: S, clock: C) -> DispatchResult<Self> {
        Self::with_config(&MonitorConfig::default(), session, sink, clock)
    }

    pub fn with_config(config: &MonitorConfig, session: Session, sink: S, clock: C) -> DispatchResult<Self> {
        config.validate()?;
        let sensor = SensorWatch::new(clock.now());
        Ok(Self {
            motion: MotionClassifier::with_config(config.motion.clone())?,
            vitals: HeartRateEscalator::with_config(config.vitals.clone())?,
            sensor,
            dispatcher: Dispatcher::new(sink),
            session,
            clock,
        })
    }

    /// Feed one accelerometer sample
    ///
    /// Returns the id of the published event when the sample confirmed a
    /// fall.
    pub async fn on_acceleration(&mut self, sample: AccelSample) -> DispatchResult<Option<EventId>> {
        let now = self.clock.now();
        let fired = self.motion.observe(sample, now)?;
        self.sensor.record_sample();

        match fired {
            Some(escalation) => self.escalate(escalation, now).await.map(Some),
            None => Ok(None),
        }
    }

    /// Feed one heart-rate reading
    ///
    /// Every valid reading becomes the session's current rate and is logged
    /// to the sink. Logging is best effort; escalation is not.
    pub async fn on_heart_rate(&mut self, bpm: u16) -> DispatchResult<Option<EventId>> {
        let now = self.clock.now();
        let rate = HeartRate::new(bpm)?;
        self.session.set_heart_rate(rate);

        let log = HealthLog::new(self.session.subject_id().clone(), rate, now);
        if let Err(e) = self.dispatcher.sink().log_health(log).await {
            log::warn!("health log for {} dropped: {}", self.session.subject_id(), e);
        }

        match self.vitals.observe(bpm, now)? {
            Some(escalation) => self.escalate(escalation, now).await.map(Some),
            None => Ok(None),
        }
    }

    /// Raise an emergency from the patient's panel
    ///
    /// Only kinds offered by the profile's accessibility panel are accepted.
    /// Manual escalations bypass the detectors' cooldowns.
    pub async fn trigger_manual(&mut self, kind: EscalationKind) -> DispatchResult<EventId> {
        if !self.session.profile().accessibility.offers(kind) {
            return Err(DispatchError::ActionNotOffered(kind));
        }
        let now = self.clock.now();
        self.escalate(Escalation::new(kind, now), now).await
    }

    async fn escalate(&self, escalation: Escalation, now: Timestamp) -> DispatchResult<EventId> {
        self.dispatcher
            .dispatch(escalation, &self.session, now)
            .await
            .map_err(|e| {
                log::warn!(
                    "{} for {} not dispatched: {}",
                    escalation.kind,
                    self.session.subject_id(),
                    e
                );
                e
            })
    }

    /// Expire detector timers while no samples arrive
    pub fn tick(&mut self) {
        self.motion.poll(self.clock.now());
    }

    pub fn motion_readout(&self) -> MotionReadout {
        self.motion.readout()
    }

    pub fn sensor_status(&self) -> SensorStatus {
        self.sensor.status(self.clock.now())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        self.dispatcher.sink()
    }
}
