use anyhow::{Context, Result};

use super::{get_key_from_env, get_stored_key, store_key};

/// Prompts for the routing service API key.
pub fn prompt_for_key() -> Result<String> {
    println!("Routing service API key required.");
    println!("Create one in the Baidu Maps open platform console.");
    println!();

    let key = rpassword::prompt_password("Enter API key: ")
        .context("Failed to read API key from stdin")?;

    let key = key.trim();

    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Ok(key.to_string())
}

/// Resolve the routing API key. A key given explicitly (flag or config)
/// wins, then the environment, then the key file; with none of those the
/// first run prompts and stores the key for later runs.
pub fn setup_api_key_if_missing(configured: Option<&str>) -> Result<String> {
    if let Some(key) = configured {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    if let Some(key) = get_key_from_env() {
        return Ok(key);
    }

    if let Some(key) = get_stored_key()? {
        return Ok(key);
    }

    let key = prompt_for_key()?;
    store_key(&key).context("Failed to store API key")?;
    println!("API key stored in the config directory.");
    Ok(key)
}
