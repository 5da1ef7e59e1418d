use anyhow::{Context, Result};
use scraper::{ElementRef, Html};

use super::selector;
use super::types::Listing;
use crate::scoring::factors;

/// Class marker on cards that advertise the platform rather than a room.
const PROMO_CLASS: &str = "zry";

/// Marker inside the image attribute of cards with no real photo. Those
/// cards are incomplete listings and never worth ranking.
const PLACEHOLDER_IMAGE_MARKER: &str = "defaultPZZ";

/// Parse one index document into listing records.
///
/// Promotional cards and cards with a placeholder photo are dropped
/// silently. Each remaining card yields `Ok(listing)` or, when the card is
/// missing expected structure, an `Err` the caller can log — one malformed
/// card never aborts the page.
pub fn extract_listings(document: &Html) -> Result<Vec<Result<Listing>>> {
    let card = selector("li.clearfix")?;
    let photo = selector("div.img.pr img")?;

    let mut out = Vec::new();
    for element in document.select(&card) {
        if element.value().classes().any(|c| c == PROMO_CLASS) {
            continue;
        }
        match has_real_photo(&element, &photo) {
            Ok(false) => continue,
            Ok(true) => out.push(parse_card(&element)),
            Err(e) => out.push(Err(e)),
        }
    }
    Ok(out)
}

fn has_real_photo(card: &ElementRef, photo: &scraper::Selector) -> Result<bool> {
    let img = card
        .select(photo)
        .next()
        .context("Listing card has no photo element")?;
    let src = img
        .value()
        .attr("_src")
        .context("Listing photo has no _src attribute")?;
    Ok(!src.contains(PLACEHOLDER_IMAGE_MARKER))
}

/// Read the raw fields out of one listing card. Field positions are fixed
/// site structure: first detail span is the unit size, third the room
/// count, and the second detail paragraph carries the distance text.
fn parse_card(card: &ElementRef) -> Result<Listing> {
    let detail = selector("div.detail")?;
    let paragraph = selector("p")?;
    let span = selector("span")?;
    let price = selector("p.price")?;
    let link = selector("h3 a")?;

    let detail_div = card
        .select(&detail)
        .next()
        .context("Listing card has no detail block")?;

    let spans: Vec<ElementRef> = detail_div.select(&span).collect();
    let size_label = text_of(spans.first().context("Listing card has no size field")?);
    let room_label = text_of(spans.get(2).context("Listing card has no room-count field")?);

    let distance_paragraph = detail_div
        .select(&paragraph)
        .nth(1)
        .context("Listing card has no distance paragraph")?;
    let distance_text = text_of(
        &distance_paragraph
            .select(&span)
            .next()
            .context("Distance paragraph has no text span")?,
    );

    let rent_label = text_of(
        &card
            .select(&price)
            .next()
            .context("Listing card has no price field")?,
    );

    let href = card
        .select(&link)
        .next()
        .context("Listing card has no detail link")?
        .value()
        .attr("href")
        .context("Listing link has no href")?;
    let detail_url = if let Some(rest) = href.strip_prefix("//") {
        format!("http://{}", rest)
    } else {
        href.to_string()
    };

    // Reject cards whose labels will not survive scoring; a bad label is a
    // per-listing failure here rather than a run failure later.
    factors::room_count(&room_label)?;
    factors::unit_size(&size_label)?;
    factors::rent(&rent_label)?;

    Ok(Listing {
        detail_url,
        room_label,
        size_label,
        rent_label,
        distance_text,
        commute_minutes: 0,
        name: String::new(),
        floorplan_url: None,
        score: 0.0,
    })
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
