use anyhow::{bail, Context, Result};

/// Metres per second assumed for the walk between the room and the platform.
const WALKING_SPEED: f64 = 1.4;

/// Suffix appended to the parsed station name to form a routing query the
/// routing service resolves to the metro station rather than the district.
const STATION_SUFFIX: &str = "-地铁站";

const LINE_MARKER: char = '线';
const STATION_MARKER: char = '站';
const METRE_MARKER: char = '米';

/// Station query string parsed out of a card's distance text.
///
/// The text packs line, station and walking distance into one string, e.g.
/// "15号线后沙峪站596米": the station name sits between the line marker and
/// the station marker.
pub fn station_query(distance_text: &str) -> Result<String> {
    let after_line = distance_text
        .split_once(LINE_MARKER)
        .with_context(|| format!("No line marker in distance text: {:?}", distance_text))?
        .1;
    let station = after_line
        .split_once(STATION_MARKER)
        .with_context(|| format!("No station marker in distance text: {:?}", distance_text))?
        .0;
    if station.is_empty() {
        bail!("Empty station name in distance text: {:?}", distance_text);
    }
    Ok(format!("{}{}", station, STATION_SUFFIX))
}

/// Seconds to walk from the room to the station platform, from the metre
/// figure that follows the station marker.
pub fn walk_seconds(distance_text: &str) -> Result<f64> {
    let after_station = distance_text
        .split_once(STATION_MARKER)
        .with_context(|| format!("No station marker in distance text: {:?}", distance_text))?
        .1;
    let metres = after_station
        .strip_suffix(METRE_MARKER)
        .with_context(|| format!("No distance unit in distance text: {:?}", distance_text))?;
    let metres: f64 = metres
        .trim()
        .parse()
        .with_context(|| format!("Bad walking distance in distance text: {:?}", distance_text))?;
    Ok(metres / WALKING_SPEED)
}

/// Total commute in whole minutes: transit leg plus the in-station walk.
pub fn total_minutes(transit_seconds: u64, walk_seconds: f64) -> u32 {
    ((transit_seconds as f64 + walk_seconds) / 60.0).round() as u32
}
