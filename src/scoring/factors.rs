//! Parsers for the free-text labels the site packs numeric attributes into.
//! Each scored attribute has its own parser so a site format change stays a
//! localized fix with its own failure mode.

use anyhow::{bail, Context, Result};

/// Principal room count: the leading digit of a label like "3室1厅".
pub fn room_count(label: &str) -> Result<u32> {
    let first = label.chars().next().context("Empty room-count label")?;
    first
        .to_digit(10)
        .with_context(|| format!("Room-count label does not start with a digit: {:?}", label))
}

/// Unit size in square metres: the numeric prefix of a label like "10.5 ㎡".
pub fn unit_size(label: &str) -> Result<f64> {
    let end = label
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(label.len());
    let prefix = &label[..end];
    if prefix.is_empty() {
        bail!("Size label has no numeric prefix: {:?}", label);
    }
    prefix
        .parse()
        .with_context(|| format!("Bad numeric prefix in size label: {:?}", label))
}

/// Monthly rent: the first integer substring of a label like "￥ 2800 (每月)".
pub fn rent(label: &str) -> Result<u64> {
    let start = label
        .find(|c: char| c.is_ascii_digit())
        .with_context(|| format!("No rent figure in label: {:?}", label))?;
    let rest = &label[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end]
        .parse()
        .with_context(|| format!("Bad rent figure in label: {:?}", label))
}
