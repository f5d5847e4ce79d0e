//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
pub use csv::Writer;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
///
/// Records must be flat structs, the first record written sets the header
/// row.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot open the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Cannot serialise the record: {0}")]
    SerialiseError(csv::Error),

    #[error("Cannot flush the archive file: {0}")]
    FlushError(std::io::Error),

    #[error("The archiver has not been initialised")]
    NotInitialised,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a timestamped csv.
///
/// To implement this trait, the struct shall have an `Archiver` member which
/// shall be setup in the struct's `init` or `new` functions.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(session: &Session, path: P) -> Result<Self, ArchiveError> {
        Self::from_full_path(session.arch_root.join(path))
    }

    /// Create a new archiver writing to the given path, truncating any
    /// existing file.
    pub fn from_full_path<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ArchiveError::FileError)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)
            .map_err(ArchiveError::FileError)?;

        let w = WriterBuilder::new().has_headers(true).from_writer(file);

        Ok(Self { writer: Some(w) })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record).map_err(ArchiveError::SerialiseError)?;
                w.flush().map_err(ArchiveError::FlushError)
            }
            None => Err(ArchiveError::NotInitialised),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        time_s: f64,
        rudder: f32,
        tacking: bool,
    }

    #[test]
    fn test_uninitialised() {
        let mut arch = Archiver::default();

        match arch.serialise(Sample {
            time_s: 0.0,
            rudder: 0.0,
            tacking: false,
        }) {
            Err(ArchiveError::NotInitialised) => (),
            other => panic!("Expected NotInitialised, got {:?}", other),
        }
    }

    #[test]
    fn test_write_records() {
        let path = std::env::temp_dir().join(format!("sail_arch_test_{}.csv", std::process::id()));
        let mut arch = Archiver::from_full_path(&path).unwrap();

        arch.serialise(Sample {
            time_s: 0.5,
            rudder: -0.25,
            tacking: true,
        })
        .unwrap();
        arch.serialise(Sample {
            time_s: 1.5,
            rudder: 0.25,
            tacking: false,
        })
        .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "time_s,rudder,tacking");
        assert_eq!(lines[1], "0.5,-0.25,true");
        assert_eq!(lines[2], "1.5,0.25,false");

        fs::remove_file(&path).ok();
    }
}
