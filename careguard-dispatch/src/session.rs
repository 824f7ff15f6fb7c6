//! Signed-in profile and live context

use careguard_core::{EscalationKind, HeartRate, SubjectId};
use serde::{Deserialize, Serialize};

use crate::registry::LinkCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Caregiver,
}

/// Accessibility profile chosen at registration
///
/// Decides which manual emergency actions the patient's panel offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Blind,
    Deaf,
    Mute,
    None,
}

impl Accessibility {
    /// Manual emergency kinds on this profile's panel, in display order
    pub const fn manual_actions(&self) -> &'static [EscalationKind] {
        match self {
            // large SOS / 112 widget plus fall
            Accessibility::Blind | Accessibility::Deaf => {
                &[EscalationKind::ManualSos, EscalationKind::FallDetected]
            }
            Accessibility::Mute => &[
                EscalationKind::GestureEmergency,
                EscalationKind::ManualSos,
                EscalationKind::FallDetected,
            ],
            Accessibility::None => &[
                EscalationKind::VoiceEmergency,
                EscalationKind::GestureEmergency,
                EscalationKind::FallDetected,
                EscalationKind::ManualSos,
            ],
        }
    }

    pub fn offers(&self, kind: EscalationKind) -> bool {
        self.manual_actions().contains(&kind)
    }
}

/// A registered person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: SubjectId,
    pub name: String,
    pub age: Option<u8>,
    pub accessibility: Accessibility,
    pub role: Role,
    /// Set for patients only
    pub link_code: Option<LinkCode>,
}

impl Profile {
    pub fn is_patient(&self) -> bool {
        self.role == Role::Patient
    }
}

/// Explicit replacement for app-global user state
///
/// Owned by the monitor of one subject; holds the profile and the most
/// recent heart rate, which is attached to every non-vital escalation.
#[derive(Debug, Clone)]
pub struct Session {
    profile: Profile,
    heart_rate: HeartRate,
}

impl Session {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            heart_rate: HeartRate::default(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn subject_id(&self) -> &SubjectId {
        &self.profile.id
    }

    pub fn heart_rate(&self) -> HeartRate {
        self.heart_rate
    }

    pub fn set_heart_rate(&mut self, heart_rate: HeartRate) {
        self.heart_rate = heart_rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_actions_per_profile() {
        use EscalationKind::*;

        assert_eq!(Accessibility::Blind.manual_actions(), &[ManualSos, FallDetected]);
        assert_eq!(Accessibility::Deaf.manual_actions(), &[ManualSos, FallDetected]);
        assert_eq!(
            Accessibility::Mute.manual_actions(),
            &[GestureEmergency, ManualSos, FallDetected]
        );
        assert_eq!(Accessibility::None.manual_actions().len(), 4);

        assert!(!Accessibility::Blind.offers(VoiceEmergency));
        assert!(!Accessibility::Mute.offers(VoiceEmergency));
        assert!(Accessibility::None.offers(VoiceEmergency));
        assert!(!Accessibility::None.offers(HeartRateCritical));
    }

    #[test]
    fn session_starts_at_resting_rate() {
        let profile = Profile {
            id: SubjectId::new("p-1").unwrap(),
            name: "Amal".into(),
            age: Some(78),
            accessibility: Accessibility::Deaf,
            role: Role::Patient,
            link_code: None,
        };
        let mut session = Session::new(profile);
        assert_eq!(session.heart_rate().bpm(), 72);

        session.set_heart_rate(HeartRate::new(95).unwrap());
        assert_eq!(session.heart_rate().bpm(), 95);
        assert!(session.profile().is_patient());
    }
}
