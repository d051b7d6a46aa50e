//! Pathogen profiles: a name, a base reproductive ratio Ro, and a lethality in [0, 1].
//!
//! A `.PATHOGEN` file is three lines: the name, Ro, and lethality. Parsing validates the values
//! so the engine refuses to run on nonsensical input.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::EpinetError;

/// Immutable once loaded; shared read-only by the propagation engine across all rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pathogen {
    pub name: String,
    pub ro: f64,
    pub lethality: f64,
}

impl Pathogen {
    /// # Errors
    ///
    /// Returns an `EpinetError` if Ro is not strictly positive or lethality is outside [0, 1].
    pub fn new(name: &str, ro: f64, lethality: f64) -> Result<Self, EpinetError> {
        let pathogen = Pathogen {
            name: name.to_string(),
            ro,
            lethality,
        };
        pathogen.validate()?;
        Ok(pathogen)
    }

    /// # Errors
    ///
    /// Returns an `EpinetError` if Ro is not strictly positive or lethality is outside [0, 1].
    pub fn validate(&self) -> Result<(), EpinetError> {
        if self.ro <= 0.0 || self.ro.is_nan() {
            return Err(EpinetError::EpinetError(format!(
                "Ro must be greater than 0, got {}",
                self.ro
            )));
        }
        if !(0.0..=1.0).contains(&self.lethality) {
            return Err(EpinetError::EpinetError(format!(
                "lethality must be in [0, 1], got {}",
                self.lethality
            )));
        }
        Ok(())
    }

    /// Reads a pathogen from a three-line `.PATHOGEN` file: name, Ro, lethality.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` if the file cannot be read, a line is missing, a number fails to
    /// parse, or the values fail validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EpinetError> {
        let contents = fs::read_to_string(path)?;
        let mut lines = contents.lines();

        let name = lines
            .next()
            .ok_or_else(|| EpinetError::from("missing pathogen name"))?
            .trim();
        let ro: f64 = lines
            .next()
            .ok_or_else(|| EpinetError::from("missing Ro"))?
            .trim()
            .parse()?;
        let lethality: f64 = lines
            .next()
            .ok_or_else(|| EpinetError::from("missing lethality"))?
            .trim()
            .parse()?;

        Pathogen::new(name, ro, lethality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn validation_accepts_sensible_values() {
        assert!(Pathogen::new("measles", 13.0, 0.03).is_ok());
        assert!(Pathogen::new("edge", 0.1, 0.0).is_ok());
        assert!(Pathogen::new("edge", 0.1, 1.0).is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(Pathogen::new("p", 0.0, 0.5).is_err());
        assert!(Pathogen::new("p", -1.0, 0.5).is_err());
        assert!(Pathogen::new("p", f64::NAN, 0.5).is_err());
        assert!(Pathogen::new("p", 2.0, -0.1).is_err());
        assert!(Pathogen::new("p", 2.0, 1.1).is_err());
    }

    #[test]
    fn from_file_parses_three_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "smallpox\n5.0\n0.3").unwrap();
        let pathogen = Pathogen::from_file(file.path()).unwrap();
        assert_eq!(pathogen.name, "smallpox");
        assert_eq!(pathogen.ro, 5.0);
        assert_eq!(pathogen.lethality, 0.3);
    }

    #[test]
    fn from_file_rejects_unparsable_ro() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "smallpox\nnot-a-number\n0.3").unwrap();
        assert!(matches!(
            Pathogen::from_file(file.path()),
            Err(EpinetError::ParseFloatError(_))
        ));
    }

    #[test]
    fn from_file_rejects_missing_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "smallpox").unwrap();
        assert!(matches!(
            Pathogen::from_file(file.path()),
            Err(EpinetError::EpinetError(_))
        ));
    }

    #[test]
    fn from_file_rejects_out_of_range_lethality() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "smallpox\n5.0\n1.5").unwrap();
        assert!(Pathogen::from_file(file.path()).is_err());
    }
}
