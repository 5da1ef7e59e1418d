pub mod prompt;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::config::{ensure_config_dir, get_config_dir};

/// Environment variable for providing the routing API key non-interactively.
pub const ENV_KEY_VAR: &str = "ROOM_RANK_AK";

const KEY_FILE: &str = "routing-api-key";

// Re-export the prompt flow for convenience
pub use prompt::{prompt_for_key, setup_api_key_if_missing};

/// Routing API key from the environment, if set and non-empty.
pub fn get_key_from_env() -> Option<String> {
    match std::env::var(ENV_KEY_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn key_file_path() -> PathBuf {
    get_config_dir().join(KEY_FILE)
}

/// Read the key saved by a previous run, if any.
pub fn get_stored_key() -> Result<Option<String>> {
    let path = key_file_path();
    if !path.exists() {
        return Ok(None);
    }
    let key = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read API key file at {}", path.display()))?;
    let key = key.trim().to_string();
    Ok(if key.is_empty() { None } else { Some(key) })
}

/// Store the API key next to the config so later runs skip the prompt.
pub fn store_key(key: &str) -> Result<()> {
    ensure_config_dir()?;
    let path = key_file_path();
    let mut file = atomic_write_file::AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open API key file at {}", path.display()))?;
    writeln!(file, "{}", key)
        .with_context(|| format!("Failed to write API key file at {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to commit API key file at {}", path.display()))?;
    Ok(())
}
