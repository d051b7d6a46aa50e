//! Individuals in the contact network: a stable identity, a sampled vulnerability multiplier,
//! a health status, and an ordered list of outgoing connections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable index into the network's arena of people.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId {
    pub id: usize,
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// The mutually exclusive health states. Exactly one holds at any time per person.
///
/// Allowed transitions: S → I (transmission), S → V (vaccination), I → R or I → D
/// (resolution). V, R and D are terminal for the duration of a run; there is no
/// reinfection.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    S,
    I,
    V,
    R,
    D,
}

impl HealthStatus {
    /// A single-word description, used in logs and reports.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            HealthStatus::S => "susceptible",
            HealthStatus::I => "infected",
            HealthStatus::V => "immune",
            HealthStatus::R => "recovered",
            HealthStatus::D => "dead",
        }
    }
}

/// One individual in the network. The id, vulnerability and connections are fixed at
/// construction; only the status is mutated as the epidemic progresses.
#[derive(Clone, Debug)]
pub struct Person {
    pub(crate) id: PersonId,
    pub(crate) vulnerability: f64,
    pub(crate) status: HealthStatus,
    pub(crate) connections: Vec<PersonId>,
}

impl Person {
    pub(crate) fn new(id: PersonId, vulnerability: f64) -> Self {
        Person {
            id,
            vulnerability,
            status: HealthStatus::S,
            connections: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PersonId {
        self.id
    }

    #[must_use]
    pub fn vulnerability(&self) -> f64 {
        self.vulnerability
    }

    #[must_use]
    pub fn status(&self) -> HealthStatus {
        self.status
    }

    /// Outgoing connections, in the order they were wired.
    #[must_use]
    pub fn connections(&self) -> &[PersonId] {
        &self.connections
    }
}
