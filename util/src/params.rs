//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::{metadata, read_to_string};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Watches a parameter file and reloads it whenever it is modified.
///
/// This is how tunable parameters sent from the ground station reach the
/// control loop: the ground link rewrites the file, the loop calls
/// `check_update` once at the top of every cycle.
pub struct ParamWatcher<P> {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    _params: PhantomData<P>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (SAIL_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$SAIL_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    load_from(&params_path(param_file_path)?)
}

/// Load a parameter file from an explicit path.
pub fn load_from<P>(path: &Path) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    let params_str = read_to_string(path).map_err(LoadError::FileLoadError)?;

    from_str(&params_str)
}

/// Parse parameters from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<P> ParamWatcher<P>
where
    P: DeserializeOwned,
{
    /// Create a new watcher for the given file, relative to the "params"
    /// directory, and return it together with the current parameters.
    pub fn new(param_file_path: &str) -> Result<(Self, P), LoadError> {
        Self::from_path(params_path(param_file_path)?)
    }

    /// Create a new watcher for the file at an explicit path.
    pub fn from_path<T: Into<PathBuf>>(path: T) -> Result<(Self, P), LoadError> {
        let path = path.into();
        let last_modified = modified_time(&path)?;
        let params = load_from(&path)?;

        Ok((
            Self {
                path,
                last_modified,
                _params: PhantomData,
            },
            params,
        ))
    }

    /// Check whether the file has been modified since the last load.
    ///
    /// Returns `Ok(Some(params))` if the file changed and was reloaded,
    /// `Ok(None)` if nothing changed. A file which fails to parse is reported
    /// once, the watcher will retry on the next modification.
    pub fn check_update(&mut self) -> Result<Option<P>, LoadError> {
        let modified = modified_time(&self.path)?;

        if modified == self.last_modified {
            return Ok(None);
        }

        self.last_modified = modified;

        load_from(&self.path).map(Some)
    }

    /// The full path of the watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn params_path(param_file_path: &str) -> Result<PathBuf, LoadError> {
    let mut path = crate::host::get_sw_root().map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    Ok(path)
}

fn modified_time(path: &Path) -> Result<Option<SystemTime>, LoadError> {
    let meta = metadata(path).map_err(LoadError::FileLoadError)?;

    // Platforms without modification times never report an update
    Ok(meta.modified().ok())
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Gains {
        p: f32,
        i: f32,
        use_conditional: i32,
    }

    #[test]
    fn test_from_str() {
        let gains: Gains = from_str("p = 0.5\ni = 0.01\nuse_conditional = 1\n").unwrap();

        assert_eq!(
            gains,
            Gains {
                p: 0.5,
                i: 0.01,
                use_conditional: 1
            }
        );
    }

    /// Rewrite the file until its modification time changes, which may take up to the timestamp
    /// resolution of the file system.
    fn rewrite(path: &Path, contents: &str) {
        let before = modified_time(path).unwrap();

        for _ in 0..300 {
            std::thread::sleep(std::time::Duration::from_millis(10));
            std::fs::write(path, contents).unwrap();

            if modified_time(path).unwrap() != before {
                return;
            }
        }

        panic!("Modification time of {:?} never changed", path);
    }

    #[test]
    fn test_watcher() {
        let path = std::env::temp_dir().join(format!(
            "sail_params_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "p = 0.5\ni = 0.01\nuse_conditional = 1\n").unwrap();

        let (mut watcher, gains) = ParamWatcher::<Gains>::from_path(&path).unwrap();
        assert_eq!(gains.p, 0.5);
        assert_eq!(watcher.path(), path.as_path());

        // Unchanged
        assert!(watcher.check_update().unwrap().is_none());

        // Rewritten with new gains
        rewrite(&path, "p = 0.8\ni = 0.02\nuse_conditional = 0\n");
        assert_eq!(
            watcher.check_update().unwrap(),
            Some(Gains {
                p: 0.8,
                i: 0.02,
                use_conditional: 0
            })
        );
        assert!(watcher.check_update().unwrap().is_none());

        // A broken file is reported once, then waits for the next modification
        rewrite(&path, "p = \n");
        match watcher.check_update() {
            Err(LoadError::DeserialiseError(_)) => (),
            other => panic!("Expected a deserialise error, got {:?}", other),
        }
        assert!(watcher.check_update().unwrap().is_none());

        // Fixing the file is picked up
        rewrite(&path, "p = 0.3\ni = 0.0\nuse_conditional = 1\n");
        assert_eq!(watcher.check_update().unwrap().map(|g| g.p), Some(0.3));

        std::fs::remove_file(&path).unwrap();

        // A deleted file is an error
        assert!(matches!(
            watcher.check_update(),
            Err(LoadError::FileLoadError(_))
        ));
    }

    #[test]
    fn test_from_str_missing_field() {
        match from_str::<Gains>("p = 0.5\n") {
            Err(LoadError::DeserialiseError(_)) => (),
            other => panic!("Expected a deserialise error, got {:?}", other),
        }
    }
}
