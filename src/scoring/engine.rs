use anyhow::{bail, Result};

use super::config::ScoringConfig;
use super::factors;
use crate::ziroom::types::Listing;

/// Reference room counts for the room factor: a two-room flat scores 1, a
/// three-room flat 0, independent of what the result set contains.
const ROOM_REFERENCE_MIN: u32 = 2;
const ROOM_REFERENCE_MAX: u32 = 3;

/// Per-factor values behind a listing's composite score, kept for display.
/// Each factor lies in [0, 1] except `rooms`, which applies the fixed
/// reference formula to whatever room count the listing has.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub commute: f64,
    pub rooms: f64,
    pub size: f64,
    pub rent: f64,
}

/// Numeric attributes of one listing, parsed out of its labels.
struct FactorValues {
    commute: f64,
    rooms: u32,
    size: f64,
    rent: f64,
}

impl FactorValues {
    fn parse(listing: &Listing) -> Result<Self> {
        Ok(Self {
            commute: listing.commute_minutes as f64,
            rooms: factors::room_count(&listing.room_label)?,
            size: factors::unit_size(&listing.size_label)?,
            rent: factors::rent(&listing.rent_label)? as f64,
        })
    }
}

/// Observed (min, max) of each normalized attribute across the set.
struct Bounds {
    commute: (f64, f64),
    size: (f64, f64),
    rent: (f64, f64),
}

impl Bounds {
    fn of(values: &[FactorValues]) -> Self {
        let mut bounds = Self {
            commute: (f64::INFINITY, f64::NEG_INFINITY),
            size: (f64::INFINITY, f64::NEG_INFINITY),
            rent: (f64::INFINITY, f64::NEG_INFINITY),
        };
        for v in values {
            bounds.commute = (bounds.commute.0.min(v.commute), bounds.commute.1.max(v.commute));
            bounds.size = (bounds.size.0.min(v.size), bounds.size.1.max(v.size));
            bounds.rent = (bounds.rent.0.min(v.rent), bounds.rent.1.max(v.rent));
        }
        bounds
    }
}

/// Score every accepted listing against the bounds of the whole set.
///
/// Normalization depends on set-wide minima and maxima, so this must only
/// run once the accepted set is complete; scoring a partial set produces
/// different numbers. An empty set has no bounds and is an error, not a
/// silent default. Returns the factor breakdowns in listing order.
pub fn score_listings(
    listings: &mut [Listing],
    config: &ScoringConfig,
) -> Result<Vec<ScoreBreakdown>> {
    if listings.is_empty() {
        bail!("Cannot score an empty listing set");
    }

    // Parse every label up front so a malformed one surfaces before any
    // listing gets a score assigned.
    let mut values = Vec::with_capacity(listings.len());
    for listing in listings.iter() {
        values.push(FactorValues::parse(listing)?);
    }
    let bounds = Bounds::of(&values);

    let commute_weight = config.commute_weight.unwrap_or(1.0);
    let room_weight = config.room_weight.unwrap_or(0.3);
    let size_weight = config.size_weight.unwrap_or(0.5);
    let rent_weight = config.rent_weight.unwrap_or(0.9);

    let mut breakdowns = Vec::with_capacity(listings.len());
    for (listing, value) in listings.iter_mut().zip(&values) {
        let breakdown = ScoreBreakdown {
            commute: normalize_inverted(value.commute, bounds.commute),
            rooms: room_factor(value.rooms),
            size: normalize(value.size, bounds.size),
            rent: normalize_inverted(value.rent, bounds.rent),
        };
        let raw = commute_weight * breakdown.commute
            + room_weight * breakdown.rooms
            + size_weight * breakdown.size
            + rent_weight * breakdown.rent;
        listing.score = round4(raw);
        breakdowns.push(breakdown);
    }
    Ok(breakdowns)
}

/// Sort scored listings best-first. The sort is stable, so listings with
/// equal scores keep their extraction-discovery order.
pub fn rank(scored: &mut [(Listing, ScoreBreakdown)]) {
    scored.sort_by(|a, b| {
        b.0.score
            .partial_cmp(&a.0.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Scale into [0, 1], larger values scoring higher. A degenerate range
/// (every listing identical on this attribute) scores 1.0 rather than
/// dividing by zero.
fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    if max == min {
        return 1.0;
    }
    (value - min) / (max - min)
}

/// Scale into [0, 1], smaller values scoring higher.
fn normalize_inverted(value: f64, (min, max): (f64, f64)) -> f64 {
    if max == min {
        return 1.0;
    }
    (max - value) / (max - min)
}

fn room_factor(rooms: u32) -> f64 {
    (ROOM_REFERENCE_MAX as f64 - rooms as f64)
        / (ROOM_REFERENCE_MAX as f64 - ROOM_REFERENCE_MIN as f64)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
