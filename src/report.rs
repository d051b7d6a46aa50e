//! CSV report output. Reports record data about the simulated epidemic for external consumers
//! (summary statistics, per-round censuses); they are distinct from logging, which describes the
//! engine's internal behavior.

use csv::Writer;
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::Path;

use crate::error::EpinetError;

pub trait Report: 'static {
    // Returns report type
    fn type_id(&self) -> TypeId;
    // Serializes the data with the correct writer
    fn serialize(&self, writer: &mut Writer<File>);
}

/// Use this macro to define a unique report type
#[macro_export]
macro_rules! define_report {
    ($name:ident) => {
        impl $crate::report::Report for $name {
            fn type_id(&self) -> std::any::TypeId {
                std::any::TypeId::of::<$name>()
            }

            fn serialize(&self, writer: &mut csv::Writer<std::fs::File>) {
                writer.serialize(self).unwrap();
            }
        }
    };
}
pub use define_report;

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist. Returns the file if successful. Called by `add_report`
fn generate_validate_filepath(path_name: &str) -> Result<File, EpinetError> {
    let path = Path::new(path_name);
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            create_dir_all(path.parent().expect("Either root or empty path provided"))?;
            let file = File::create(path)?;
            Ok(file)
        }
        _ => Err(EpinetError::EpinetError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

/// Maps report types to their csv file writers.
#[derive(Default)]
pub struct ReportSink {
    file_writers: RefCell<HashMap<TypeId, Writer<File>>>,
}

impl ReportSink {
    #[must_use]
    pub fn new() -> Self {
        ReportSink::default()
    }

    /// Call `add_report` with each report type, passing the complete path to which to write the
    /// report.
    ///
    /// # Errors
    ///
    /// Returns an `EpinetError` if the path is not a `.csv` or the file cannot be created.
    pub fn add_report<T: Report + 'static>(&mut self, filepath: &str) -> Result<(), EpinetError> {
        let file = generate_validate_filepath(filepath)?;
        let writer = Writer::from_writer(file);
        self.file_writers
            .borrow_mut()
            .insert(TypeId::of::<T>(), writer);
        Ok(())
    }

    /// Writes a new row with columns following items in the report struct to the report file
    /// associated with the report type.
    ///
    /// # Panics
    ///
    /// Panics if no report of this type was added.
    pub fn send_report<T: Report>(&self, report: T) {
        let mut writer_cell = self.file_writers.try_borrow_mut().unwrap();
        let writer = writer_cell
            .get_mut(&report.type_id())
            .expect("No writer found for the report type");
        report.serialize(writer);
        writer.flush().expect("Failed to flush writer");
    }
}
