//! Emergency Dispatch for CareGuard
//!
//! ## Overview
//!
//! `careguard-core` decides *whether* something is an emergency. This crate
//! decides *where it goes*: it stamps escalations with the patient and their
//! current heart rate, publishes them to an [`EventSink`], and gives
//! caregivers a live, resolvable feed of their linked patients' events.
//!
//! ```text
//!  accelerometer ──┐                                       ┌──→ CaregiverFeed
//!  heart rate ─────┼─→ PatientMonitor ─→ Dispatcher ─→ EventSink
//!  panel buttons ──┘        │                              └──→ subscribers
//!                        Session
//! ```
//!
//! ## Roles and Linking
//!
//! Patients register with an accessibility profile and receive a six
//! character link code. A caregiver registers with that code and is linked
//! to the patient; from then on the caregiver's feed includes the patient's
//! events. Only patients raise emergencies.
//!
//! ## Delivery Guarantees
//!
//! - Every escalation is published exactly once; a failed publish is
//!   returned to the caller and never retried here.
//! - Events are stored in insertion order per subject and queried newest
//!   first.
//! - Resolving an event is idempotent.
//! - Subscribers that fall behind skip the missed events with a warning
//!   instead of blocking publishers.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use careguard_core::time::SystemTime;
//! use careguard_dispatch::{
//!     registry::Registry, session::{Accessibility, Session},
//!     store::MemoryStore, monitor::PatientMonitor,
//! };
//!
//! # async fn example() -> Result<(), careguard_dispatch::DispatchError> {
//! let registry = Registry::new();
//! let patient = registry.register_patient("Amal", Some(78), Accessibility::Blind)?;
//!
//! let store = Arc::new(MemoryStore::default());
//! let mut monitor = PatientMonitor::new(Session::new(patient), store.clone(), SystemTime)?;
//! monitor.on_heart_rate(72).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod feed;
pub mod monitor;
pub mod registry;
pub mod session;
pub mod sink;
pub mod store;

// Re-export common types
pub use config::MonitorConfig;
pub use dispatcher::Dispatcher;
pub use feed::CaregiverFeed;
pub use monitor::PatientMonitor;
pub use registry::{LinkCode, Registry};
pub use session::{Accessibility, Profile, Role, Session};
pub use sink::{EventId, EventSink, FallRecord, HealthLog, StoredEvent, Subscription};
pub use store::MemoryStore;

use careguard_core::{CoreError, EscalationKind};
use thiserror::Error;

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Dispatch, registry and sink errors
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Rejected detector input or configuration
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Only patients can raise emergencies")]
    NotAPatient,

    #[error("{0} is not offered on this profile's emergency panel")]
    ActionNotOffered(EscalationKind),

    #[error("Unknown link code: {0}")]
    UnknownLinkCode(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
