use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Name of the SQLite file holding the ticket log.
pub const DATABASE_FILENAME: &str = "incident_system.sqlite";

/// Resolves the portable data layout next to the executable.
pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root directory (where the executable lives).
    pub fn root_dir() -> PathBuf {
        #[cfg(debug_assertions)]
        {
            // In development the executable sits in target/debug at the workspace root
            if let Ok(mut path) = std::env::current_exe() {
                path.pop(); // exe name
                path.pop(); // debug
                path.pop(); // target

                let core_path = path.join("apps").join("core");
                if core_path.exists() {
                    return core_path;
                }
                return path;
            }
        }

        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                warn!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Database directory (./data/db).
    pub fn db_dir() -> PathBuf {
        Self::data_dir().join("db")
    }

    /// Local model cache (./data/models), used by the embedding zero-shot backend.
    pub fn models_dir() -> PathBuf {
        Self::data_dir().join("models")
    }

    /// Default location of the ticket database.
    pub fn default_db_path() -> PathBuf {
        Self::db_dir().join(DATABASE_FILENAME)
    }

    /// Creates the data, db and models directories if they are missing.
    pub fn init() -> Result<(), std::io::Error> {
        for dir in [Self::data_dir(), Self::db_dir(), Self::models_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_nested_under_data_dir() {
        let data = PortablePathManager::data_dir();
        assert!(PortablePathManager::db_dir().starts_with(&data));
        assert!(PortablePathManager::models_dir().starts_with(&data));
        assert!(PortablePathManager::default_db_path().ends_with(DATABASE_FILENAME));
    }
}
