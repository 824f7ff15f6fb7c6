//! Patient and caregiver registration
//!
//! Patients get a six character link code from an alphabet without the
//! easily confused `I`, `O`, `0` and `1`. A caregiver types the code to link
//! with the patient.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use careguard_core::SubjectId;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    session::{Accessibility, Profile, Role},
    DispatchError, DispatchResult,
};

/// Characters a link code is drawn from
pub const LINK_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a link code
pub const LINK_CODE_LEN: usize = 6;

/// Attempts at drawing an unused code before giving up
const MAX_CODE_ATTEMPTS: usize = 16;

/// Six character patient link code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkCode(String);

impl LinkCode {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..LINK_CODE_LEN)
            .map(|_| char::from(LINK_CODE_ALPHABET[rng.gen_range(0..LINK_CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Parse user input; surrounding whitespace and case are ignored
    pub fn parse(input: &str) -> DispatchResult<Self> {
        let code = input.trim().to_ascii_uppercase();
        let valid = code.len() == LINK_CODE_LEN
            && code.bytes().all(|b| LINK_CODE_ALPHABET.contains(&b));

        if valid {
            Ok(Self(code))
        } else {
            Err(DispatchError::UnknownLinkCode(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LinkCode {
    type Error = DispatchError;

    fn try_from(value: String) -> DispatchResult<Self> {
        Self::parse(&value)
    }
}

impl From<LinkCode> for String {
    fn from(code: LinkCode) -> String {
        code.0
    }
}

/// Caregiver to patient association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverLink {
    pub caregiver_id: SubjectId,
    pub patient_id: SubjectId,
}

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<SubjectId, Profile>,
    codes: HashMap<LinkCode, SubjectId>,
    links: Vec<CaregiverLink>,
}

/// In-memory profile directory
#[derive(Debug)]
pub struct Registry<R = StdRng> {
    tables: Mutex<Tables>,
    rng: Mutex<R>,
}

impl Default for Registry<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> Registry<R> {
    /// Registry drawing link codes from `rng`
    pub fn with_rng(rng: R) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            rng: Mutex::new(rng),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn new_subject_id() -> DispatchResult<SubjectId> {
        let id = Uuid::new_v4().hyphenated().to_string();
        SubjectId::new(&id).ok_or_else(|| DispatchError::Registry(format!("subject id too long: {}", id)))
    }

    fn unused_code(&self, tables: &Tables) -> DispatchResult<LinkCode> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = LinkCode::generate(&mut *rng);
            if !tables.codes.contains_key(&code) {
                return Ok(code);
            }
            log::debug!("link code {} already taken, drawing again", code);
        }
        Err(DispatchError::Registry("no unused link code found".into()))
    }

    /// Create a patient profile with a fresh link code
    pub fn register_patient(
        &self,
        name: &str,
        age: Option<u8>,
        accessibility: Accessibility,
    ) -> DispatchResult<Profile> {
        let mut tables = self.tables();
        let code = self.unused_code(&tables)?;
        let profile = Profile {
            id: Self::new_subject_id()?,
            name: name.to_string(),
            age,
            accessibility,
            role: Role::Patient,
            link_code: Some(code.clone()),
        };

        tables.codes.insert(code, profile.id.clone());
        tables.profiles.insert(profile.id.clone(), profile.clone());
        log::info!("registered patient {} ({:?})", profile.id, accessibility);
        Ok(profile)
    }

    /// Create a caregiver linked to the patient holding `code`
    ///
    /// Returns the caregiver and the linked patient. Nothing is created if
    /// the code is unknown.
    pub fn register_caregiver(&self, name: &str, code: &str) -> DispatchResult<(Profile, Profile)> {
        let code = LinkCode::parse(code)?;
        let mut tables = self.tables();
        let patient = Self::patient_for(&tables, &code)?;

        let caregiver = Profile {
            id: Self::new_subject_id()?,
            name: name.to_string(),
            age: None,
            accessibility: Accessibility::None,
            role: Role::Caregiver,
            link_code: None,
        };

        tables.profiles.insert(caregiver.id.clone(), caregiver.clone());
        tables.links.push(CaregiverLink {
            caregiver_id: caregiver.id.clone(),
            patient_id: patient.id.clone(),
        });
        log::info!("caregiver {} linked to patient {}", caregiver.id, patient.id);
        Ok((caregiver, patient))
    }

    /// Link an existing caregiver to another patient
    pub fn link(&self, caregiver_id: &SubjectId, code: &str) -> DispatchResult<Profile> {
        let code = LinkCode::parse(code)?;
        let mut tables = self.tables();

        match tables.profiles.get(caregiver_id) {
            Some(profile) if profile.role == Role::Caregiver => {}
            _ => return Err(DispatchError::UnknownProfile(caregiver_id.to_string())),
        }
        let patient = Self::patient_for(&tables, &code)?;

        let already = tables
            .links
            .iter()
            .any(|l| &l.caregiver_id == caregiver_id && l.patient_id == patient.id);
        if !already {
            tables.links.push(CaregiverLink {
                caregiver_id: caregiver_id.clone(),
                patient_id: patient.id.clone(),
            });
        }
        Ok(patient)
    }

    fn patient_for(tables: &Tables, code: &LinkCode) -> DispatchResult<Profile> {
        tables
            .codes
            .get(code)
            .and_then(|id| tables.profiles.get(id))
            .cloned()
            .ok_or_else(|| DispatchError::UnknownLinkCode(code.to_string()))
    }

    pub fn profile(&self, id: &SubjectId) -> Option<Profile> {
        self.tables().profiles.get(id).cloned()
    }

    /// Patients a caregiver is linked to, in link order
    pub fn linked_patients(&self, caregiver_id: &SubjectId) -> Vec<Profile> {
        let tables = self.tables();
        tables
            .links
            .iter()
            .filter(|l| &l.caregiver_id == caregiver_id)
            .filter_map(|l| tables.profiles.get(&l.patient_id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Registry {
        Registry::with_rng(StdRng::seed_from_u64(1))
    }

    #[test]
    fn codes_use_the_alphabet() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let code = LinkCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), LINK_CODE_LEN);
            assert!(code.as_str().bytes().all(|b| LINK_CODE_ALPHABET.contains(&b)));
            assert!(!code.as_str().contains(['I', 'O', '0', '1']));
        }
    }

    #[test]
    fn parse_normalizes_input() {
        assert_eq!(LinkCode::parse(" ab3k9z ").unwrap().as_str(), "AB3K9Z");
        assert!(LinkCode::parse("AB3K9").is_err());
        assert!(LinkCode::parse("AB3K9O").is_err());
    }

    #[test]
    fn patients_get_distinct_codes() {
        let registry = seeded();
        let mut codes = std::collections::HashSet::new();
        for i in 0..200 {
            let patient = registry
                .register_patient(&format!("patient {}", i), None, Accessibility::None)
                .unwrap();
            assert!(patient.is_patient());
            assert!(codes.insert(patient.link_code.unwrap()));
        }
    }

    #[test]
    fn caregiver_links_by_code() {
        let registry = seeded();
        let patient = registry.register_patient("Amal", Some(78), Accessibility::Blind).unwrap();
        let code = patient.link_code.clone().unwrap();

        let (caregiver, linked) = registry
            .register_caregiver("Sami", &code.as_str().to_lowercase())
            .unwrap();
        assert_eq!(caregiver.role, Role::Caregiver);
        assert_eq!(linked.id, patient.id);
        assert_eq!(registry.linked_patients(&caregiver.id), vec![patient]);
    }

    #[test]
    fn unknown_code_creates_nothing() {
        let registry = seeded();
        let err = registry.register_caregiver("Sami", "ZZZZZZ").unwrap_err();
        assert!(matches!(err, DispatchError::UnknownLinkCode(_)));
        assert!(registry.tables().profiles.is_empty());
    }

    #[test]
    fn linking_twice_is_a_no_op() {
        let registry = seeded();
        let first = registry.register_patient("A", None, Accessibility::Deaf).unwrap();
        let second = registry.register_patient("B", None, Accessibility::Mute).unwrap();
        let (caregiver, _) = registry
            .register_caregiver("C", first.link_code.as_ref().unwrap().as_str())
            .unwrap();

        let code = second.link_code.clone().unwrap();
        registry.link(&caregiver.id, code.as_str()).unwrap();
        registry.link(&caregiver.id, code.as_str()).unwrap();

        let linked: Vec<_> = registry.linked_patients(&caregiver.id).into_iter().map(|p| p.name).collect();
        assert_eq!(linked, vec!["A", "B"]);
    }

    #[test]
    fn patients_cannot_link() {
        let registry = seeded();
        let patient = registry.register_patient("A", None, Accessibility::None).unwrap();
        let code = patient.link_code.clone().unwrap();
        assert!(matches!(
            registry.link(&patient.id, code.as_str()),
            Err(DispatchError::UnknownProfile(_))
        ));
    }
}
