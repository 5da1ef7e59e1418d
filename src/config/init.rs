use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use super::get_config_path;

/// Starter config written by `room-rank init`. The query URLs are the
/// site's search pages for two-room and three-room shares in the target
/// rent band; swap in your own searches.
const STARTER_CONFIG: &str = r#"# room-rank configuration
queries:
  - name: two-room
    url: "http://www.ziroom.com/z/nl/z2-r2100TO3000-u2-a2.html"
  - name: three-room
    url: "http://www.ziroom.com/z/nl/z2-r2100TO3000-u3-a2.html"

# Listings with a longer door-to-door commute are dropped.
commute_ceiling_minutes: 40

# The ranked report, overwritten on every run.
output: rooms.csv

request_timeout: 30s

routing:
  endpoint: "http://api.map.baidu.com/direction/v1"
  destination: "人民大学"
  region: "北京"
  # api_key: "..."   # or set ROOM_RANK_AK, or let the first run prompt you

# Weights for the ranking factors. Each factor scales to [0, 1] first.
# scoring:
#   commute_weight: 1.0
#   room_weight: 0.3
#   size_weight: 0.5
#   rent_weight: 0.9
"#;

/// Write a commented starter config the user can edit. Refuses to clobber
/// an existing file.
pub fn write_starter_config(path: Option<PathBuf>) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(get_config_path);
    if config_path.exists() {
        bail!("Config already exists at {}", config_path.display());
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(&config_path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
}
