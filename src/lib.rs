//! A stochastic epidemic simulation engine over synthetic contact networks
//!
//! Epinet simulates the spread of an infectious pathogen through a synthetic
//! contact network with heterogeneous individual susceptibility, partial
//! vaccination, and stochastic recovery/death outcomes. A run produces an
//! epidemic trajectory (per-round status snapshots) and summary statistics
//! (mortality, immunity, residual-network structure) for a given pathogen
//! profile and population size.
//!
//! A simulation proceeds in stages:
//! * A network builder synthesizes a contact graph whose degree sequence
//!   follows a configurable power-law distribution, solved per-draw with
//!   Newton's method, and assigns each person a normally distributed
//!   vulnerability multiplier.
//! * A vaccination step marks a random subset of the population immune, and
//!   a configurable number of patients zero are seeded.
//! * The propagation engine advances the epidemic one round at a time:
//!   infected people attempt to transmit to each outgoing neighbor, then
//!   resolve their own outcome (recovery or death), until no one remains
//!   infected.
//! * Degree statistics over the residual (still-susceptible) subgraph yield
//!   the frailty and interference measures of how infection reshaped the
//!   network.
//!
//! All randomness flows from one seeded generator threaded explicitly through
//! every sampling call, so identical seeds reproduce identical runs.

pub mod error;
pub mod log;
pub mod network;
pub mod parameters;
pub mod pathogen;
pub mod people;
pub mod prelude;
pub mod report;
pub mod runner;
pub mod sampling;
pub mod simulation;
pub mod transmission;

pub use crate::error::EpinetError;
pub use crate::log::{debug, error, info, trace, warn};
