//! Per-round disease propagation: the transmissibility function and the one-round state
//! transition over the contact network.

use rand::Rng;

use crate::log::{debug, warn};
use crate::network::Network;
use crate::pathogen::Pathogen;
use crate::people::{HealthStatus, PersonId};

/// Per-round, per-edge probability threshold governing infection spread:
/// `T = (Ro / k2)·(k − 1)` where `k` is the network's mean out-degree and `k2` its mean squared
/// out-degree.
///
/// This is recomputed from the *full* network's degree statistics every round, not the residual
/// subgraph — a simplifying assumption carried from the reference model, deliberately preserved
/// even though the residual statistics are computed separately for frailty and interference.
///
/// A network with no edges has `k2 = 0` and an undefined transmissibility; that degenerate case
/// yields 0 so that no infection can spread.
#[must_use]
pub fn transmissibility(ro: f64, network: &Network) -> f64 {
    let k2 = network.mean_squared_degree();
    if k2 == 0.0 {
        warn!("transmissibility undefined on an edgeless network; treating as 0");
        return 0.0;
    }
    (ro / k2) * (network.mean_degree() - 1.0)
}

/// Advances the epidemic by one round and returns the number of new infections.
///
/// The round is a single forward pass over the arena in index order, mutating statuses in place.
/// For each person found Infected when their index is visited:
///
/// - each outgoing neighbor currently Susceptible draws a uniform value, scaled by the *source's*
///   vulnerability, and becomes Infected if the result is at most the round's transmissibility;
/// - the person then resolves their own outcome: a uniform draw scaled by their own vulnerability
///   against the pathogen's lethality decides Dead versus Recovered.
///
/// Because statuses mutate during the scan, a person infected earlier in the same round is
/// processed this round only if their index has not been visited yet (the "same-round cascade").
/// This in-place forward-scan semantics is intentional; a snapshot-then-apply round would change
/// observable behavior.
pub fn advance_round<R: Rng>(network: &mut Network, pathogen: &Pathogen, rng: &mut R) -> usize {
    let t = transmissibility(pathogen.ro, network);
    let mut new_infections = 0;

    for id in 0..network.population() {
        let person = PersonId { id };
        if network.status(person) != HealthStatus::I {
            continue;
        }
        let vulnerability = network.vulnerability(person);

        let neighbors = network.connections(person).to_vec();
        for neighbor in neighbors {
            if network.status(neighbor) != HealthStatus::S {
                continue;
            }
            let draw: f64 = rng.random::<f64>() * vulnerability;
            if draw <= t {
                network.set_status(neighbor, HealthStatus::I);
                new_infections += 1;
                debug!("person {person} infected person {neighbor}");
            }
        }

        let draw: f64 = rng.random::<f64>() * vulnerability;
        let outcome = if draw <= pathogen.lethality {
            HealthStatus::D
        } else {
            HealthStatus::R
        };
        network.set_status(person, outcome);
        debug!("person {person} is now {}", outcome.description());
    }

    new_infections
}
