//! Escalation Events
//!
//! ## Overview
//!
//! An escalation is the only thing the core produces. Detectors emit a bare
//! [`Escalation`] (what happened and when); the dispatcher turns it into an
//! [`EscalationEvent`] by attaching the subject, the heart rate at the time
//! of the trigger, and a [`RiskLevel`] derived from the kind alone.
//!
//! ```text
//! MotionClassifier ──┐
//!                    ├── Escalation ──→ Dispatcher ──→ EscalationEvent ──→ sink
//! HeartRateEscalator ┘                    ↑
//!                                   Session (subject, current BPM)
//! ```
//!
//! ## Risk Classification
//!
//! Severity is a pure function of the kind. The dispatcher never re-derives
//! risk from heart rate, motion intensity or anything else:
//!
//! | Kind                 | Risk   |
//! |----------------------|--------|
//! | `FallDetected`       | HIGH   |
//! | `HeartRateCritical`  | HIGH   |
//! | `ManualSos`          | HIGH   |
//! | `VoiceEmergency`     | MEDIUM |
//! | `GestureEmergency`   | MEDIUM |
//! | `Custom(_)`          | LOW    |

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;
use crate::vitals::HeartRate;

/// Maximum length of an inline subject identifier
///
/// Fits a hyphenated UUID.
pub const MAX_SUBJECT_ID: usize = 36;

/// Identity of the monitored person
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SubjectId(heapless::String<MAX_SUBJECT_ID>);

impl SubjectId {
    /// Create from string slice, `None` if longer than [`MAX_SUBJECT_ID`]
    pub fn new(id: &str) -> Option<Self> {
        let mut inner = heapless::String::new();
        inner.push_str(id).ok()?;
        Some(Self(inner))
    }

    /// Borrow the id as text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What raised the escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EscalationKind {
    /// Free-fall followed by impact, or the shake gesture
    FallDetected,
    /// Heart rate crossed the critical threshold
    HeartRateCritical,
    /// SOS or emergency-number button
    ManualSos,
    /// Spoken emergency request
    VoiceEmergency,
    /// Emergency gesture
    GestureEmergency,
    /// Deployment-specific trigger
    Custom(u8),
}

impl EscalationKind {
    /// All built-in kinds, in panel order
    pub const BUILT_IN: [EscalationKind; 5] = [
        EscalationKind::FallDetected,
        EscalationKind::HeartRateCritical,
        EscalationKind::ManualSos,
        EscalationKind::VoiceEmergency,
        EscalationKind::GestureEmergency,
    ];

    /// Human-readable label shown to caregivers
    pub const fn label(&self) -> &'static str {
        match self {
            EscalationKind::FallDetected => "Fall Detected",
            EscalationKind::HeartRateCritical => "Heart Rate Critical",
            EscalationKind::ManualSos => "Manual SOS",
            EscalationKind::VoiceEmergency => "Voice Emergency",
            EscalationKind::GestureEmergency => "Gesture Emergency",
            EscalationKind::Custom(_) => "Custom Emergency",
        }
    }
}

impl fmt::Display for EscalationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity attached to a dispatched event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[repr(u8)]
pub enum RiskLevel {
    /// Informational
    Low = 0,
    /// Needs attention soon
    Medium = 1,
    /// Needs attention now
    High = 2,
}

impl RiskLevel {
    /// Severity for an escalation kind
    pub const fn classify(kind: EscalationKind) -> Self {
        match kind {
            EscalationKind::FallDetected
            | EscalationKind::HeartRateCritical
            | EscalationKind::ManualSos => RiskLevel::High,
            EscalationKind::VoiceEmergency
            | EscalationKind::GestureEmergency => RiskLevel::Medium,
            EscalationKind::Custom(_) => RiskLevel::Low,
        }
    }

    /// Wire name, upper case
    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw detector output, before dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    /// What fired
    pub kind: EscalationKind,
    /// Timestamp of the sample or reading that fired
    pub detected_at: Timestamp,
    /// Heart rate known to the detector, if any
    ///
    /// The heart-rate escalator fills this with the triggering reading.
    /// Motion and manual escalations leave it empty and the dispatcher uses
    /// the session's current rate.
    pub heart_rate: Option<HeartRate>,
}

impl Escalation {
    /// Escalation of `kind` detected at `detected_at`
    pub const fn new(kind: EscalationKind, detected_at: Timestamp) -> Self {
        Self {
            kind,
            detected_at,
            heart_rate: None,
        }
    }

    /// Attach the rate measured when the escalation fired
    pub const fn with_heart_rate(mut self, heart_rate: HeartRate) -> Self {
        self.heart_rate = Some(heart_rate);
        self
    }
}

/// Classified, stamped emergency ready for the sink
///
/// Immutable once created. Fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EscalationEvent {
    kind: EscalationKind,
    risk_level: RiskLevel,
    heart_rate_at_trigger: HeartRate,
    timestamp: Timestamp,
    subject_id: SubjectId,
}

impl EscalationEvent {
    /// Classify and stamp an escalation
    ///
    /// `fallback_heart_rate` is used when the escalation carries none.
    pub fn new(
        escalation: Escalation,
        subject_id: SubjectId,
        fallback_heart_rate: HeartRate,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind: escalation.kind,
            risk_level: RiskLevel::classify(escalation.kind),
            heart_rate_at_trigger: escalation.heart_rate.unwrap_or(fallback_heart_rate),
            timestamp,
            subject_id,
        }
    }

    /// What happened
    pub fn kind(&self) -> EscalationKind {
        self.kind
    }

    /// Severity derived from the kind
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Session heart rate when the event was raised
    pub fn heart_rate_at_trigger(&self) -> HeartRate {
        self.heart_rate_at_trigger
    }

    /// When the event was raised (ms)
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Patient the event belongs to
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_bounds() {
        let id = SubjectId::new("6f1c2a9e-58f4-4b7b-9a8e-3b2d1f0c4e5a").unwrap();
        assert_eq!(id.as_str().len(), MAX_SUBJECT_ID);

        assert!(SubjectId::new("6f1c2a9e-58f4-4b7b-9a8e-3b2d1f0c4e5a-x").is_none());
    }

    #[test]
    fn classification_table() {
        assert_eq!(RiskLevel::classify(EscalationKind::FallDetected), RiskLevel::High);
        assert_eq!(RiskLevel::classify(EscalationKind::HeartRateCritical), RiskLevel::High);
        assert_eq!(RiskLevel::classify(EscalationKind::ManualSos), RiskLevel::High);
        assert_eq!(RiskLevel::classify(EscalationKind::VoiceEmergency), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(EscalationKind::GestureEmergency), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(EscalationKind::Custom(7)), RiskLevel::Low);
    }

    #[test]
    fn classification_is_stable() {
        for kind in EscalationKind::BUILT_IN {
            let first = RiskLevel::classify(kind);
            for _ in 0..100 {
                assert_eq!(RiskLevel::classify(kind), first);
            }
        }
    }

    #[test]
    fn event_prefers_escalation_heart_rate() {
        let subject = SubjectId::new("patient-1").unwrap();
        let resting = HeartRate::new(72).unwrap();

        let fall = Escalation::new(EscalationKind::FallDetected, 1_000);
        let event = EscalationEvent::new(fall, subject.clone(), resting, 1_005);
        assert_eq!(event.heart_rate_at_trigger(), resting);
        assert_eq!(event.risk_level(), RiskLevel::High);
        assert_eq!(event.timestamp(), 1_005);

        let spike = Escalation::new(EscalationKind::HeartRateCritical, 2_000)
            .with_heart_rate(HeartRate::new(131).unwrap());
        let event = EscalationEvent::new(spike, subject, resting, 2_000);
        assert_eq!(event.heart_rate_at_trigger().bpm(), 131);
    }

    #[test]
    fn labels_match_caregiver_feed() {
        assert_eq!(EscalationKind::ManualSos.label(), "Manual SOS");
        assert_eq!(RiskLevel::Medium.as_str(), "MEDIUM");
    }
}
