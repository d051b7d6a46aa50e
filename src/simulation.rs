//! The simulation driver: builds the network, vaccinates, seeds patients zero, then advances
//! rounds until the epidemic dies out, collecting a per-round snapshot trail along the way.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EpinetError;
use crate::log::{info, trace};
use crate::network::{Network, StatusCensus};
use crate::parameters::ParametersValues;
use crate::pathogen::Pathogen;
use crate::people::{HealthStatus, PersonId};
use crate::transmission::advance_round;

/// The status of every person at the end of a round. Round 0 is the initial state, after
/// vaccination and seeding but before any propagation.
#[derive(Clone, Debug)]
pub struct RoundSnapshot {
    pub round: usize,
    pub statuses: Vec<HealthStatus>,
}

/// One complete simulation run. The network and pathogen are constructed once and held for the
/// run's duration; per-person status is the only state that changes between rounds.
pub struct Simulation {
    network: Network,
    pathogen: Pathogen,
    vaccination_rate: f64,
    rng: StdRng,
    snapshots: Vec<RoundSnapshot>,
}

impl Simulation {
    /// Validates the parameters, builds and wires the network, vaccinates, and seeds the initial
    /// infections. Every random draw comes from a single generator seeded with `seed`, in a fixed
    /// order (vulnerabilities, then degrees and edge targets, then vaccination, then seeding), so
    /// identical inputs reproduce identical runs.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` if any parameter is invalid or network construction fails.
    pub fn new(parameters: &ParametersValues, seed: u64) -> Result<Self, EpinetError> {
        parameters.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);

        info!(
            "building network with population {} for pathogen {}",
            parameters.population, parameters.pathogen.name
        );
        let distribution = parameters.degree_distribution()?;
        let mut network = Network::build(parameters.population, &distribution, &mut rng)?;

        let vaccinated = network.vaccinate(parameters.vaccination_rate, &mut rng)?;
        info!(
            "vaccinated {vaccinated} of {} people (rate {})",
            parameters.population, parameters.vaccination_rate
        );

        let seeded = seed_infections(&mut network, parameters.initial_infections, &mut rng);
        if seeded < parameters.initial_infections {
            info!(
                "only {seeded} of {} initial infections seeded; no susceptible people remain",
                parameters.initial_infections
            );
        }

        let initial = RoundSnapshot {
            round: 0,
            statuses: network.statuses(),
        };
        Ok(Simulation {
            network,
            pathogen: parameters.pathogen.clone(),
            vaccination_rate: parameters.vaccination_rate,
            rng,
            snapshots: vec![initial],
        })
    }

    /// Advances the epidemic round by round until no one is infected, recording a snapshot after
    /// each round. Returns the number of propagation rounds executed. A run seeded with zero
    /// infections executes zero rounds.
    ///
    /// # Errors
    ///
    /// Every infected person resolves in the round they are processed, so the epidemic must die
    /// out within `population` rounds; exceeding that bound is a defect and is surfaced as an
    /// `EpinetError` rather than looping forever.
    pub fn run(&mut self) -> Result<usize, EpinetError> {
        let max_rounds = self.network.population();
        let mut round = 0;

        while self.network.has_infected() {
            if round >= max_rounds {
                return Err(EpinetError::EpinetError(format!(
                    "epidemic failed to die out within {max_rounds} rounds"
                )));
            }
            round += 1;
            let new_infections = advance_round(&mut self.network, &self.pathogen, &mut self.rng);
            trace!("round {round}: {new_infections} new infections");
            self.snapshots.push(RoundSnapshot {
                round,
                statuses: self.network.statuses(),
            });
        }

        let census = self.network.census();
        info!(
            "epidemic died out after {round} rounds: {} dead, {} recovered, {} immune, {} untouched",
            census.dead, census.recovered, census.vaccinated, census.susceptible
        );
        Ok(round)
    }

    /// Per-round status snapshots, starting with the initial (round 0) state.
    #[must_use]
    pub fn snapshots(&self) -> &[RoundSnapshot] {
        &self.snapshots
    }

    /// Counts per status category for the current network state.
    #[must_use]
    pub fn census(&self) -> StatusCensus {
        self.network.census()
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    #[must_use]
    pub fn pathogen(&self) -> &Pathogen {
        &self.pathogen
    }

    #[must_use]
    pub fn vaccination_rate(&self) -> f64 {
        self.vaccination_rate
    }
}

/// Seeds up to `count` distinct infections among the people still Susceptible, drawing uniformly
/// at random. Stops early when no susceptible people remain (in particular, when everyone was
/// vaccinated). Returns the number of people actually seeded.
fn seed_infections<R: Rng>(network: &mut Network, count: usize, rng: &mut R) -> usize {
    let mut seeded = 0;
    for _ in 0..count {
        if network.census().susceptible == 0 {
            break;
        }
        loop {
            let id = rng.random_range(0..network.population());
            let person = PersonId { id };
            if network.status(person) == HealthStatus::S {
                network.set_status(person, HealthStatus::I);
                trace!("seeded patient zero {person}");
                seeded += 1;
                break;
            }
        }
    }
    seeded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters(
        population: usize,
        vaccination_rate: f64,
        initial_infections: usize,
        ro: f64,
        lethality: f64,
    ) -> ParametersValues {
        ParametersValues {
            population,
            vaccination_rate,
            initial_infections,
            pathogen: Pathogen::new("test", ro, lethality).unwrap(),
            degree_alpha: 2.0,
            degree_kappa: 94.2,
            degree_scale: None,
        }
    }

    #[test]
    fn invalid_parameters_refuse_to_run() {
        let mut bad = parameters(100, 0.5, 1, 2.0, 0.1);
        bad.population = 0;
        assert!(Simulation::new(&bad, 42).is_err());
    }

    #[test]
    fn zero_seeded_infections_terminate_immediately() {
        let mut simulation = Simulation::new(&parameters(50, 0.0, 0, 5.0, 0.5), 42).unwrap();
        let rounds = simulation.run().unwrap();
        assert_eq!(rounds, 0);
        assert_eq!(simulation.snapshots().len(), 1);
        let census = simulation.census();
        assert_eq!(census.susceptible, 50);
        assert_eq!(census.total(), 50);
    }

    #[test]
    fn full_vaccination_blocks_all_seeding() {
        let mut simulation = Simulation::new(&parameters(50, 1.0, 10, 5.0, 0.5), 42).unwrap();
        let rounds = simulation.run().unwrap();
        assert_eq!(rounds, 0);
        let census = simulation.census();
        assert_eq!(census.vaccinated, 50);
        assert_eq!(census.infected, 0);
    }

    #[test]
    fn seeding_marks_the_requested_number_infected() {
        let simulation = Simulation::new(&parameters(100, 0.0, 5, 5.0, 0.5), 42).unwrap();
        assert_eq!(simulation.census().infected, 5);
    }

    #[test]
    fn lethality_one_kills_every_infected_person() {
        let mut simulation = Simulation::new(&parameters(200, 0.0, 1, 3.0, 1.0), 42).unwrap();
        simulation.run().unwrap();
        let census = simulation.census();
        assert_eq!(census.recovered, 0);
        assert!(census.dead >= 1);
        assert_eq!(census.total(), 200);
    }

    #[test]
    fn census_sums_to_population_in_every_snapshot() {
        let mut simulation = Simulation::new(&parameters(150, 0.2, 3, 4.0, 0.3), 7).unwrap();
        simulation.run().unwrap();
        for snapshot in simulation.snapshots() {
            assert_eq!(snapshot.statuses.len(), 150);
        }
        assert_eq!(simulation.census().total(), 150);
    }

    #[test]
    fn terminal_state_has_no_infected_people() {
        let mut simulation = Simulation::new(&parameters(100, 0.1, 2, 6.0, 0.4), 11).unwrap();
        simulation.run().unwrap();
        assert_eq!(simulation.census().infected, 0);
        assert!(!simulation.network().has_infected());
    }

    #[test]
    fn identical_seeds_reproduce_identical_runs() {
        let run = |seed| {
            let mut simulation =
                Simulation::new(&parameters(100, 0.2, 2, 4.0, 0.3), seed).unwrap();
            simulation.run().unwrap();
            (simulation.census(), simulation.snapshots().len())
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn snapshot_trail_starts_at_round_zero_and_is_contiguous() {
        let mut simulation = Simulation::new(&parameters(100, 0.0, 1, 5.0, 0.5), 13).unwrap();
        let rounds = simulation.run().unwrap();
        let snapshots = simulation.snapshots();
        assert_eq!(snapshots.len(), rounds + 1);
        for (i, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.round, i);
        }
    }
}
