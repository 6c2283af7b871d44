//! Environment file loading

use crate::error::Result;

/// Loads optional `.env` files ahead of environment merging
pub struct EnvManager;

impl EnvManager {
    /// Load a `.env` file from the working directory if one exists
    ///
    /// A missing file is fine; a present-but-broken file is a configuration
    /// error worth surfacing.
    pub fn load_env_file(debug: bool) -> Result<()> {
        match dotenv::dotenv() {
            Ok(path) => {
                if debug {
                    println!("Loaded environment from {}", path.display());
                }
                Ok(())
            }
            Err(error) if error.not_found() => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
