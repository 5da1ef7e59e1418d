use std::io::IsTerminal;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::ScoreBreakdown;
use crate::ziroom::types::Listing;

/// Serialize one listing as a report line. The fixed field order is the
/// format: no header and no escaping, consumers split on commas.
pub fn csv_line(listing: &Listing) -> String {
    format!(
        "{},{},{},{},{},{},{},{:.4}",
        listing.name,
        listing.commute_minutes,
        listing.room_label,
        listing.size_label,
        listing.rent_label,
        listing.detail_url,
        listing.floorplan_url.as_deref().unwrap_or(""),
        listing.score,
    )
}

/// Render the ranked set as CSV content, one listing per line.
pub fn to_csv<'a, I>(listings: I) -> String
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut out = String::new();
    for listing in listings {
        out.push_str(&csv_line(listing));
        out.push('\n');
    }
    out
}

/// Write the ranked CSV, atomically replacing any previous report.
pub fn write_csv<'a, I>(listings: I, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let mut file = atomic_write_file::AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(to_csv(listings).as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to commit {}", path.display()))?;
    Ok(())
}

/// Detail URL of the listing ranked at `index` (1-based) in an exported
/// report.
pub fn detail_url_at(path: &Path, index: usize) -> Result<String> {
    if index == 0 {
        bail!("Listing indexes start at 1");
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("No report at {} (run `room-rank` first)", path.display()))?;
    let line = content
        .lines()
        .nth(index - 1)
        .with_context(|| format!("No listing at index {} in {}", index, path.display()))?;
    detail_url_from_line(line)
}

/// Detail URL is the third field from the end. The name field may itself
/// contain commas, so fields are counted from the right.
fn detail_url_from_line(line: &str) -> Result<String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 8 {
        bail!("Malformed report line: {:?}", line);
    }
    Ok(fields[fields.len() - 3].to_string())
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a listing name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the ranked set as a table: index, score, commute, name, rent.
/// No headers. Index and score columns are right-aligned.
pub fn format_ranked_table(scored: &[(Listing, ScoreBreakdown)], use_colors: bool) -> String {
    if scored.is_empty() {
        return "No listings found.".to_string();
    }

    let term_width = get_terminal_width();

    // Index column: 3 chars + 1 space. Score column: 7 chars ("-9.9999"
    // worst case). Commute column: 7 chars ("999 min").
    let index_width = 3;
    let score_width = 7;
    let separator = "  ";

    scored
        .iter()
        .enumerate()
        .map(|(idx, (listing, _))| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>width$.4}", listing.score, width = score_width);
            let commute_str = format!("{:>3} min", listing.commute_minutes);

            let rent_len = listing.rent_label.chars().count();
            let fixed_width =
                index_width + 1 + score_width + 7 + separator.len() * 3 + rent_len;

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&listing.name, width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_name(&listing.name, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                listing.name.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    commute_str,
                    separator,
                    name,
                    separator,
                    listing.rent_label.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_str, separator, commute_str, separator, name, separator,
                    listing.rent_label
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single listing with detailed multi-line output (for verbose mode)
pub fn format_listing_detail(listing: &Listing, use_colors: bool) -> String {
    let floorplan = listing.floorplan_url.as_deref().unwrap_or("(none)");
    if use_colors {
        format!(
            "{}\n  Commute: {} min\n  Layout: {} ({})\n  Rent: {}\n  Score: {:.4}\n  URL: {}\n  Floor plan: {}",
            listing.name.bold(),
            listing.commute_minutes,
            listing.room_label,
            listing.size_label,
            listing.rent_label.cyan(),
            listing.score,
            listing.detail_url.underline(),
            floorplan,
        )
    } else {
        format!(
            "{}\n  Commute: {} min\n  Layout: {} ({})\n  Rent: {}\n  Score: {:.4}\n  URL: {}\n  Floor plan: {}",
            listing.name,
            listing.commute_minutes,
            listing.room_label,
            listing.size_label,
            listing.rent_label,
            listing.score,
            listing.detail_url,
            floorplan,
        )
    }
}

/// One-line rendering of the factor values behind a score.
pub fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    format!(
        "commute {:.2}, rooms {:.2}, size {:.2}, rent {:.2}",
        breakdown.commute, breakdown.rooms, breakdown.size, breakdown.rent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            detail_url: "http://www.ziroom.com/z/vr/60895710.html".to_string(),
            room_label: "3室1厅".to_string(),
            size_label: "10 ㎡".to_string(),
            rent_label: "￥ 2800 (每月)".to_string(),
            distance_text: String::new(),
            commute_minutes: 37,
            name: "鑫苑鑫都汇3居室-03卧".to_string(),
            floorplan_url: Some("http://pic.ziroom.com/plan.jpg".to_string()),
            score: 1.7,
        }
    }

    #[test]
    fn test_csv_line_field_order() {
        assert_eq!(
            csv_line(&sample_listing()),
            "鑫苑鑫都汇3居室-03卧,37,3室1厅,10 ㎡,￥ 2800 (每月),\
             http://www.ziroom.com/z/vr/60895710.html,http://pic.ziroom.com/plan.jpg,1.7000"
        );
    }

    #[test]
    fn test_csv_line_missing_floorplan_is_empty_field() {
        let mut listing = sample_listing();
        listing.floorplan_url = None;
        let line = csv_line(&listing);
        assert!(line.contains(",http://www.ziroom.com/z/vr/60895710.html,,1.7000"));
    }

    #[test]
    fn test_to_csv_is_deterministic() {
        let listings = vec![sample_listing(), sample_listing()];
        let first = to_csv(&listings);
        let second = to_csv(&listings);
        assert_eq!(first, second);
        assert_eq!(first.lines().count(), 2);
        assert!(first.ends_with('\n'));
    }

    #[test]
    fn test_detail_url_from_line() {
        let line = csv_line(&sample_listing());
        assert_eq!(
            detail_url_from_line(&line).unwrap(),
            "http://www.ziroom.com/z/vr/60895710.html"
        );
    }

    #[test]
    fn test_detail_url_survives_comma_in_name() {
        let mut listing = sample_listing();
        listing.name = "望京,西园三区2居室".to_string();
        let line = csv_line(&listing);
        assert_eq!(
            detail_url_from_line(&line).unwrap(),
            "http://www.ziroom.com/z/vr/60895710.html"
        );
    }

    #[test]
    fn test_detail_url_from_short_line_is_an_error() {
        assert!(detail_url_from_line("a,b,c").is_err());
    }

    #[test]
    fn test_write_csv_roundtrip_is_byte_identical() {
        let dir = std::env::temp_dir().join("room-rank-formatter-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rooms.csv");

        let listings = vec![sample_listing(), sample_listing()];
        write_csv(&listings, &path).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_csv(&listings, &path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);

        assert_eq!(
            detail_url_at(&path, 1).unwrap(),
            "http://www.ziroom.com/z/vr/60895710.html"
        );
        assert!(detail_url_at(&path, 0).is_err());
        assert!(detail_url_at(&path, 3).is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_truncate_name_short_unchanged() {
        assert_eq!(truncate_name("short", 20), "short");
    }

    #[test]
    fn test_truncate_name_long_gets_ellipsis() {
        let truncated = truncate_name("鑫苑鑫都汇3居室-03卧", 8);
        assert_eq!(truncated, "鑫苑鑫都汇...");
        assert_eq!(truncated.chars().count(), 8);
    }

    #[test]
    fn test_format_ranked_table_plain() {
        let breakdown = ScoreBreakdown {
            commute: 1.0,
            rooms: 0.0,
            size: 0.5,
            rent: 0.5,
        };
        let scored = vec![(sample_listing(), breakdown)];
        let table = format_ranked_table(&scored, false);
        assert!(table.starts_with(" 1."));
        assert!(table.contains("1.7000"));
        assert!(table.contains("37 min"));
        assert!(table.contains("￥ 2800 (每月)"));
    }

    #[test]
    fn test_format_ranked_table_empty() {
        assert_eq!(format_ranked_table(&[], false), "No listings found.");
    }

    #[test]
    fn test_format_breakdown() {
        let breakdown = ScoreBreakdown {
            commute: 1.0,
            rooms: 0.0,
            size: 0.25,
            rent: 0.45,
        };
        assert_eq!(
            format_breakdown(&breakdown),
            "commute 1.00, rooms 0.00, size 0.25, rent 0.45"
        );
    }
}
