use anyhow::{Context, Result};

/// Open a listing's detail page in the user's default browser.
///
/// # Errors
/// Returns error if no browser is available to handle the URL
pub fn open_listing(url: &str) -> Result<()> {
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for listing: {}", url))?;
    Ok(())
}
