pub use crate::error::EpinetError;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::network::{Network, StatusCensus};
pub use crate::parameters::ParametersValues;
pub use crate::pathogen::Pathogen;
pub use crate::people::{HealthStatus, Person, PersonId};
pub use crate::report::{Report, ReportSink};
pub use crate::sampling::DegreeDistribution;
pub use crate::simulation::{RoundSnapshot, Simulation};
pub use crate::transmission::{advance_round, transmissibility};
pub use crate::define_report;
