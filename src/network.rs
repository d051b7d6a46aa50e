//! The contact network: a fixed-size arena of people with directed connections, plus the degree
//! statistics that characterize how infection reshapes connectivity.
//!
//! Connections are stored as indices into the arena rather than references, which keeps ownership
//! simple and makes per-round snapshotting trivial. Edges are directional: transmission is only
//! evaluated from the infected side along stored edges, so an edge from A to B does not imply one
//! from B to A.

use rand::seq::index::sample as sample_indices;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EpinetError;
use crate::log::trace;
use crate::people::{HealthStatus, Person, PersonId};
use crate::sampling::{sample_power_law_degree, sample_vulnerability, DegreeDistribution};

/// Counts of people per health status. The counts always sum to the population size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCensus {
    pub susceptible: usize,
    pub infected: usize,
    pub vaccinated: usize,
    pub recovered: usize,
    pub dead: usize,
}

impl StatusCensus {
    #[must_use]
    pub fn from_statuses(statuses: &[HealthStatus]) -> Self {
        let mut census = StatusCensus::default();
        for status in statuses {
            match status {
                HealthStatus::S => census.susceptible += 1,
                HealthStatus::I => census.infected += 1,
                HealthStatus::V => census.vaccinated += 1,
                HealthStatus::R => census.recovered += 1,
                HealthStatus::D => census.dead += 1,
            }
        }
        census
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.vaccinated + self.recovered + self.dead
    }
}

/// A fixed-size ordered collection of people. The population is established at construction and
/// never resized; per-person status is the only mutable state.
pub struct Network {
    people: Vec<Person>,
}

impl Network {
    /// Creates a network of `population` susceptible people with no connections and a neutral
    /// vulnerability of 1.0. Useful for tests and degenerate-case handling; simulations normally
    /// go through [`Network::build`].
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` if `population` is zero.
    pub fn unconnected(population: usize) -> Result<Self, EpinetError> {
        if population == 0 {
            return Err(EpinetError::EpinetError(String::from(
                "population must be greater than 0",
            )));
        }
        let people = (0..population)
            .map(|id| Person::new(PersonId { id }, 1.0))
            .collect();
        Ok(Network { people })
    }

    /// Builds a network of `population` people wired according to the power-law degree
    /// distribution. All vulnerabilities are sampled first in index order, then each person's
    /// degree and targets, so a given seed always reproduces the identical network.
    ///
    /// Each person's targets are chosen uniformly at random among the other people, with no
    /// self-connections and no duplicate targets. Selection is independent per person; the
    /// resulting graph is directed.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` if `population` is zero, the distribution parameters are
    /// invalid, or degree sampling fails to converge.
    pub fn build<R: Rng>(
        population: usize,
        distribution: &DegreeDistribution,
        rng: &mut R,
    ) -> Result<Self, EpinetError> {
        distribution.validate()?;
        let mut network = Network::unconnected(population)?;

        trace!("sampling vulnerabilities for {population} people");
        for person in &mut network.people {
            person.vulnerability = sample_vulnerability(rng);
        }

        trace!("wiring connections");
        for i in 0..population {
            // A person cannot connect to more people than exist, excluding themselves.
            let degree = sample_power_law_degree(rng, distribution, population - 1)?;

            // Choose `degree` distinct indices from the population minus person i, then shift
            // past i to map back into the full index range.
            let targets = sample_indices(rng, population - 1, degree);
            for target in targets {
                let id = if target >= i { target + 1 } else { target };
                network.add_edge(PersonId { id: i }, PersonId { id })?;
            }
        }

        Ok(network)
    }

    /// Adds a directed connection from `person` to `neighbor`.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` on a self-connection or a duplicate target.
    pub fn add_edge(&mut self, person: PersonId, neighbor: PersonId) -> Result<(), EpinetError> {
        if person == neighbor {
            return Err(EpinetError::EpinetError(String::from(
                "Cannot make edge to self",
            )));
        }
        if person.id >= self.people.len() || neighbor.id >= self.people.len() {
            return Err(EpinetError::EpinetError(String::from(
                "Edge endpoint out of range",
            )));
        }
        let connections = &mut self.people[person.id].connections;
        if connections.contains(&neighbor) {
            return Err(EpinetError::EpinetError(String::from("Edge already exists")));
        }
        connections.push(neighbor);
        Ok(())
    }

    /// Visits every person and, independently with probability `rate`, moves them from
    /// Susceptible to Vaccinated. Must run before any infection seeding. Returns the number of
    /// people vaccinated.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` if `rate` is outside [0, 1].
    pub fn vaccinate<R: Rng>(&mut self, rate: f64, rng: &mut R) -> Result<usize, EpinetError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(EpinetError::EpinetError(format!(
                "vaccination rate must be in [0, 1], got {rate}"
            )));
        }
        let mut vaccinated = 0;
        for person in &mut self.people {
            if person.status == HealthStatus::S && rng.random_bool(rate) {
                person.status = HealthStatus::V;
                vaccinated += 1;
            }
        }
        Ok(vaccinated)
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// # Panics
    ///
    /// Panics if `person` is out of range.
    #[must_use]
    pub fn status(&self, person: PersonId) -> HealthStatus {
        self.people[person.id].status
    }

    pub fn set_status(&mut self, person: PersonId, status: HealthStatus) {
        self.people[person.id].status = status;
    }

    /// # Panics
    ///
    /// Panics if `person` is out of range.
    #[must_use]
    pub fn vulnerability(&self, person: PersonId) -> f64 {
        self.people[person.id].vulnerability
    }

    /// # Panics
    ///
    /// Panics if `person` is out of range.
    #[must_use]
    pub fn connections(&self, person: PersonId) -> &[PersonId] {
        &self.people[person.id].connections
    }

    /// The status of every person in index order, for per-round snapshots.
    #[must_use]
    pub fn statuses(&self) -> Vec<HealthStatus> {
        self.people.iter().map(|p| p.status).collect()
    }

    /// True if any person is currently infected. This is how the round loop knows when to stop.
    #[must_use]
    pub fn has_infected(&self) -> bool {
        self.people.iter().any(|p| p.status == HealthStatus::I)
    }

    #[must_use]
    pub fn census(&self) -> StatusCensus {
        let statuses = self.statuses();
        StatusCensus::from_statuses(&statuses)
    }

    /// Mean out-degree over all people.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_degree(&self) -> f64 {
        let total: usize = self.people.iter().map(|p| p.connections.len()).sum();
        total as f64 / self.people.len() as f64
    }

    /// Mean squared out-degree over all people.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_squared_degree(&self) -> f64 {
        let total: usize = self
            .people
            .iter()
            .map(|p| p.connections.len() * p.connections.len())
            .sum();
        total as f64 / self.people.len() as f64
    }

    /// Mean out-degree restricted to people still Susceptible, or `None` if no one is.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_residual_degree(&self) -> Option<f64> {
        let mut total = 0;
        let mut residual = 0;
        for person in &self.people {
            if person.status == HealthStatus::S {
                residual += 1;
                total += person.connections.len();
            }
        }
        if residual == 0 {
            return None;
        }
        Some(total as f64 / residual as f64)
    }

    /// Mean count, over Susceptible people, of their outgoing neighbors that are also
    /// Susceptible; `None` if no one is Susceptible.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn residual_residual_degree(&self) -> Option<f64> {
        let mut total = 0;
        let mut residual = 0;
        for person in &self.people {
            if person.status == HealthStatus::S {
                residual += 1;
                total += person
                    .connections
                    .iter()
                    .filter(|n| self.people[n.id].status == HealthStatus::S)
                    .count();
            }
        }
        if residual == 0 {
            return None;
        }
        Some(total as f64 / residual as f64)
    }

    /// Fraction of mean degree lost from the general population to the residual (untouched)
    /// population: `(k − k_res) / k`. Higher values indicate the epidemic preferentially removed
    /// high-degree people from circulation. `None` when undefined (no edges, or no Susceptible
    /// people remain).
    #[must_use]
    pub fn frailty(&self) -> Option<f64> {
        let k = self.mean_degree();
        if k == 0.0 {
            return None;
        }
        let k_res = self.mean_residual_degree()?;
        Some((k - k_res) / k)
    }

    /// How much the residual population's internal connectivity has been depleted relative to its
    /// connectivity to the whole network: `(k_res − k_rr) / k`. `None` when undefined.
    #[must_use]
    pub fn interference(&self) -> Option<f64> {
        let k = self.mean_degree();
        if k == 0.0 {
            return None;
        }
        let k_res = self.mean_residual_degree()?;
        let k_rr = self.residual_residual_degree()?;
        Some((k_res - k_rr) / k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build_network(population: usize, seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        #[allow(clippy::cast_precision_loss)]
        let distribution =
            DegreeDistribution::new(2.0, 94.2, (population as f64 / 10.0).max(1.0)).unwrap();
        Network::build(population, &distribution, &mut rng).unwrap()
    }

    #[test]
    fn zero_population_is_rejected() {
        assert!(matches!(
            Network::unconnected(0),
            Err(EpinetError::EpinetError(_))
        ));
    }

    #[test]
    fn no_self_connections_or_duplicates() {
        for seed in 0..5 {
            let network = build_network(200, seed);
            for person in network.people() {
                assert!(!person.connections().contains(&person.id()));
                let mut seen = person.connections().to_vec();
                seen.sort_unstable_by_key(|n| n.id);
                seen.dedup();
                assert_eq!(seen.len(), person.connections().len());
            }
        }
    }

    #[test]
    fn population_of_one_gets_no_connections() {
        let network = build_network(1, 42);
        assert!(network.people()[0].connections().is_empty());
    }

    #[test]
    fn identical_seeds_reproduce_identical_networks() {
        let a = build_network(100, 9);
        let b = build_network(100, 9);
        for (pa, pb) in a.people().iter().zip(b.people()) {
            assert_eq!(pa.vulnerability(), pb.vulnerability());
            assert_eq!(pa.connections(), pb.connections());
        }
    }

    #[test]
    fn add_edge_to_self_fails() {
        let mut network = Network::unconnected(3).unwrap();
        let result = network.add_edge(PersonId { id: 1 }, PersonId { id: 1 });
        assert!(matches!(result, Err(EpinetError::EpinetError(_))));
    }

    #[test]
    fn add_edge_twice_fails() {
        let mut network = Network::unconnected(3).unwrap();
        network
            .add_edge(PersonId { id: 1 }, PersonId { id: 2 })
            .unwrap();
        let result = network.add_edge(PersonId { id: 1 }, PersonId { id: 2 });
        assert!(matches!(result, Err(EpinetError::EpinetError(_))));
    }

    #[test]
    fn add_edge_out_of_range_fails() {
        let mut network = Network::unconnected(3).unwrap();
        let result = network.add_edge(PersonId { id: 0 }, PersonId { id: 7 });
        assert!(matches!(result, Err(EpinetError::EpinetError(_))));
    }

    #[test]
    fn vaccinate_rate_zero_leaves_everyone_susceptible() {
        let mut network = build_network(100, 3);
        let vaccinated = network.vaccinate(0.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(vaccinated, 0);
        assert_eq!(network.census().susceptible, 100);
    }

    #[test]
    fn vaccinate_rate_one_vaccinates_everyone() {
        let mut network = build_network(100, 3);
        let vaccinated = network.vaccinate(1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(vaccinated, 100);
        assert_eq!(network.census().vaccinated, 100);
        assert_eq!(network.census().susceptible, 0);
    }

    #[test]
    fn vaccinate_only_touches_susceptible_people() {
        let mut network = Network::unconnected(2).unwrap();
        network.set_status(PersonId { id: 0 }, HealthStatus::R);
        network.vaccinate(1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(network.status(PersonId { id: 0 }), HealthStatus::R);
        assert_eq!(network.status(PersonId { id: 1 }), HealthStatus::V);
    }

    #[test]
    fn vaccinate_rejects_invalid_rate() {
        let mut network = Network::unconnected(2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(network.vaccinate(-0.1, &mut rng).is_err());
        assert!(network.vaccinate(1.1, &mut rng).is_err());
    }

    #[test]
    fn census_always_sums_to_population() {
        let mut network = build_network(50, 11);
        network.vaccinate(0.3, &mut StdRng::seed_from_u64(11)).unwrap();
        network.set_status(PersonId { id: 0 }, HealthStatus::I);
        network.set_status(PersonId { id: 1 }, HealthStatus::D);
        assert_eq!(network.census().total(), 50);
    }

    #[test]
    fn mean_degree_is_a_pure_function_of_state() {
        let network = build_network(100, 5);
        assert_eq!(network.mean_degree(), network.mean_degree());
        assert_eq!(network.mean_squared_degree(), network.mean_squared_degree());
    }

    #[test]
    fn degree_statistics_on_a_known_graph() {
        let mut network = Network::unconnected(4).unwrap();
        // degrees: 2, 1, 1, 0
        network
            .add_edge(PersonId { id: 0 }, PersonId { id: 1 })
            .unwrap();
        network
            .add_edge(PersonId { id: 0 }, PersonId { id: 2 })
            .unwrap();
        network
            .add_edge(PersonId { id: 1 }, PersonId { id: 2 })
            .unwrap();
        network
            .add_edge(PersonId { id: 2 }, PersonId { id: 3 })
            .unwrap();
        assert_approx_eq!(network.mean_degree(), 1.0);
        assert_approx_eq!(network.mean_squared_degree(), 1.5);
    }

    #[test]
    fn frailty_is_zero_when_no_infection_occurred() {
        let network = build_network(100, 5);
        // Everyone is still Susceptible, so the residual network is the whole network.
        assert_approx_eq!(network.frailty().unwrap(), 0.0);
        assert_approx_eq!(network.interference().unwrap(), 0.0);
    }

    #[test]
    fn residual_statistics_undefined_without_susceptible_people() {
        let mut network = build_network(10, 5);
        for id in 0..10 {
            network.set_status(PersonId { id }, HealthStatus::D);
        }
        assert!(network.mean_residual_degree().is_none());
        assert!(network.residual_residual_degree().is_none());
        assert!(network.frailty().is_none());
        assert!(network.interference().is_none());
    }

    #[test]
    fn statistics_undefined_on_an_edgeless_network() {
        let network = Network::unconnected(5).unwrap();
        assert_eq!(network.mean_degree(), 0.0);
        assert!(network.frailty().is_none());
        assert!(network.interference().is_none());
    }

    #[test]
    fn frailty_reflects_removal_of_high_degree_people() {
        let mut network = Network::unconnected(3).unwrap();
        // Person 0 carries both edges; killing them strips the residual network's degree.
        network
            .add_edge(PersonId { id: 0 }, PersonId { id: 1 })
            .unwrap();
        network
            .add_edge(PersonId { id: 0 }, PersonId { id: 2 })
            .unwrap();
        network.set_status(PersonId { id: 0 }, HealthStatus::D);
        // k = 2/3, k_res = 0, frailty = (k - 0)/k = 1
        assert_approx_eq!(network.frailty().unwrap(), 1.0);
    }

    #[test]
    fn interference_on_a_partially_infected_chain() {
        let mut network = Network::unconnected(4).unwrap();
        network
            .add_edge(PersonId { id: 0 }, PersonId { id: 1 })
            .unwrap();
        network
            .add_edge(PersonId { id: 1 }, PersonId { id: 2 })
            .unwrap();
        network
            .add_edge(PersonId { id: 2 }, PersonId { id: 3 })
            .unwrap();
        network.set_status(PersonId { id: 3 }, HealthStatus::R);
        // Susceptible: 0, 1, 2. k = 3/4, k_res = 1, k_rr = 2/3 (2's neighbor 3 is recovered).
        assert_approx_eq!(network.mean_residual_degree().unwrap(), 1.0);
        assert_approx_eq!(network.residual_residual_degree().unwrap(), 2.0 / 3.0);
        assert_approx_eq!(
            network.interference().unwrap(),
            (1.0 - 2.0 / 3.0) / (3.0 / 4.0)
        );
    }
}
