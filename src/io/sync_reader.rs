//! Synchronous transition-script reader with iterator interface
//!
//! Provides a streaming iterator over script steps from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding `Result<ScriptStep, String>`
//! for each CSV row:
//!
//! ```no_run
//! use trade_workflow::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(step) => println!("Replaying: {:?}", step),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Row parse errors are yielded as Err variants, prefixed with the line number

use crate::io::csv_format::{convert_script_record, ScriptRecord, ScriptStep};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous script reader
///
/// Reads one row at a time, so memory stays constant in the script length.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Open a script for streaming iteration
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Accept rows without the trailing args column
    /// - Use an 8KB buffer
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the script CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if the file opened
    /// * `Err(String)` naming the path if it could not be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use trade_workflow::io::sync_reader::SyncReader;
    /// use std::path::Path;
    ///
    /// match SyncReader::new(Path::new("script.csv")) {
    ///     Ok(reader) => println!("{} rows", reader.count()),
    ///     Err(e) => eprintln!("Failed to open script: {}", e),
    /// }
    /// ```
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<ScriptStep, String>;

    /// Read the next script row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(ScriptStep))` - A bootstrap call or a parsed invocation
    /// * `Some(Err(String))` - CSV or argument error, prefixed with the line number
    /// * `None` - End of the script
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<ScriptRecord>();
        let next = deserializer.next()?;
        self.line_num += 1;

        // +1 for the header row
        let line = self.line_num + 1;
        Some(match next {
            Ok(record) => convert_script_record(record).map_err(|e| format!("Line {}: {}", line, e)),
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
