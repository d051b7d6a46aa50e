//! Simulation parameters, loaded from a JSON config file and validated before anything runs.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::EpinetError;
use crate::pathogen::Pathogen;
use crate::sampling::DegreeDistribution;

fn default_degree_alpha() -> f64 {
    2.0
}

fn default_degree_kappa() -> f64 {
    94.2
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ParametersValues {
    pub population: usize,
    pub vaccination_rate: f64,
    /// Number of patients zero. Zero means no one is infected and the run terminates
    /// immediately.
    pub initial_infections: usize,
    pub pathogen: Pathogen,
    #[serde(default = "default_degree_alpha")]
    pub degree_alpha: f64,
    #[serde(default = "default_degree_kappa")]
    pub degree_kappa: f64,
    /// Scale constant C of the degree distribution. Defaults to population / 10 when absent.
    #[serde(default)]
    pub degree_scale: Option<f64>,
}

impl ParametersValues {
    /// # Errors
    ///
    /// Returns an `EpinetError` if the file cannot be opened or is not valid JSON.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EpinetError> {
        let file = File::open(path)?;
        let parameters: ParametersValues = serde_json::from_reader(file)?;
        Ok(parameters)
    }

    /// Checks every construction-time invariant so the engine refuses to run rather than
    /// produce nonsensical output.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), EpinetError> {
        if self.population == 0 {
            return Err(EpinetError::EpinetError(String::from(
                "population must be greater than 0",
            )));
        }
        if !(0.0..=1.0).contains(&self.vaccination_rate) {
            return Err(EpinetError::EpinetError(format!(
                "vaccination rate must be in [0, 1], got {}",
                self.vaccination_rate
            )));
        }
        self.pathogen.validate()?;
        self.degree_distribution()?.validate()?;
        Ok(())
    }

    /// The degree distribution described by these parameters, with the scale constant defaulted
    /// to population / 10.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` if the shape parameters are invalid.
    #[allow(clippy::cast_precision_loss)]
    pub fn degree_distribution(&self) -> Result<DegreeDistribution, EpinetError> {
        let scale = self
            .degree_scale
            .unwrap_or(self.population as f64 / 10.0);
        DegreeDistribution::new(self.degree_alpha, self.degree_kappa, scale)
    }
}
