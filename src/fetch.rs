use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

use crate::config::Config;
use crate::routing::RoutingClient;
use crate::ziroom::types::Listing;
use crate::ziroom::{commute, detail, extract, pages};

/// How many listings are enriched concurrently per page. The stream is
/// `buffered`, not unordered: results come back in discovery order, which
/// the ranking's tie-breaking relies on.
const MAX_CONCURRENT_ENRICHMENTS: usize = 10;

/// Crawl every configured query, enrich each listing with its commute and
/// detail-page data, and accumulate everything under the commute ceiling.
///
/// Failures are tiered: a listing that fails to parse or route is logged
/// and skipped, a page that fails to fetch is logged and the crawl moves
/// on, a query whose pagination cannot be resolved is logged and skipped.
/// Only a run where no query works at all is an error.
pub async fn collect_listings(
    client: &reqwest::Client,
    routing: &RoutingClient,
    config: &Config,
    verbose: bool,
) -> Result<Vec<Listing>> {
    let mut accepted = Vec::new();
    let mut any_succeeded = false;

    for query in &config.queries {
        let label = query.name.as_deref().unwrap_or(&query.url);

        let page_total = match pages::resolve_page_count(client, &query.url).await {
            Ok(n) => n,
            Err(e) => {
                eprintln!("Query failed: {} - {:#}", label, e);
                continue;
            }
        };
        any_succeeded = true;

        if verbose {
            eprintln!("{}: {} page(s)", label, page_total);
        }

        for page in 1..=page_total {
            let document = match pages::fetch_index_page(client, &query.url, page).await {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Page {} of {} failed: {:#}", page, label, e);
                    continue;
                }
            };

            let cards = match extract::extract_listings(&document) {
                Ok(cards) => cards,
                Err(e) => {
                    eprintln!("Page {} of {} failed: {:#}", page, label, e);
                    continue;
                }
            };

            let raw: Vec<Listing> = cards
                .into_iter()
                .filter_map(|card| match card {
                    Ok(listing) => Some(listing),
                    Err(e) => {
                        eprintln!("Skipping listing: {:#}", e);
                        None
                    }
                })
                .collect();

            if verbose {
                eprintln!("  page {}: {} listing(s)", page, raw.len());
            }

            let enriched: Vec<Option<Listing>> = stream::iter(raw)
                .map(|listing| enrich_listing(client, routing, listing))
                .buffered(MAX_CONCURRENT_ENRICHMENTS)
                .collect()
                .await;

            for listing in enriched.into_iter().flatten() {
                if !accepts(&listing, config.commute_ceiling_minutes) {
                    if verbose {
                        eprintln!(
                            "  over ceiling ({} min): {}",
                            listing.commute_minutes, listing.detail_url
                        );
                    }
                    continue;
                }
                accepted.push(listing);
            }
        }
    }

    if !any_succeeded && !config.queries.is_empty() {
        anyhow::bail!("All queries failed. Check your network connection and the query URLs.");
    }

    Ok(dedup_by_url(accepted))
}

/// Enrich one listing, or drop it. The routing query is mandatory: a
/// listing without a commute estimate cannot be ranked, so any failure in
/// the chain discards the listing rather than defaulting a value. One
/// listing's failure never touches its siblings.
async fn enrich_listing(
    client: &reqwest::Client,
    routing: &RoutingClient,
    mut listing: Listing,
) -> Option<Listing> {
    match try_enrich(client, routing, &mut listing).await {
        Ok(()) => Some(listing),
        Err(e) => {
            eprintln!("Skipping {}: {:#}", listing.detail_url, e);
            None
        }
    }
}

async fn try_enrich(
    client: &reqwest::Client,
    routing: &RoutingClient,
    listing: &mut Listing,
) -> Result<()> {
    let station = commute::station_query(&listing.distance_text)?;
    let walk = commute::walk_seconds(&listing.distance_text)?;
    let transit = routing.transit_seconds(&station).await?;
    listing.commute_minutes = commute::total_minutes(transit, walk);

    detail::enrich_from_detail_page(client, listing).await?;
    Ok(())
}

/// Commute ceiling filter: at the ceiling is acceptable, over it is not.
fn accepts(listing: &Listing, ceiling_minutes: u32) -> bool {
    listing.commute_minutes <= ceiling_minutes
}

/// Drop duplicate listings, keeping the first occurrence of each detail
/// URL (the same room can appear under more than one query).
fn dedup_by_url(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen_urls = HashSet::new();
    listings
        .into_iter()
        .filter(|listing| seen_urls.insert(listing.detail_url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(url: &str, commute: u32) -> Listing {
        Listing {
            detail_url: url.to_string(),
            room_label: "2室1厅".to_string(),
            size_label: "10 ㎡".to_string(),
            rent_label: "￥ 2800 (每月)".to_string(),
            distance_text: String::new(),
            commute_minutes: commute,
            name: String::new(),
            floorplan_url: None,
            score: 0.0,
        }
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        assert!(accepts(&listing("http://a", 39), 40));
        assert!(accepts(&listing("http://a", 40), 40));
        assert!(!accepts(&listing("http://a", 41), 40));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let deduped = dedup_by_url(vec![
            listing("http://a", 10),
            listing("http://b", 20),
            listing("http://a", 30),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].detail_url, "http://a");
        assert_eq!(deduped[0].commute_minutes, 10);
        assert_eq!(deduped[1].detail_url, "http://b");
    }

    #[tokio::test]
    async fn test_enrichment_failure_becomes_none_not_panic() {
        // Malformed distance text fails before any network request; the
        // failure is contained in the listing's own slot.
        let client = crate::ziroom::create_client(std::time::Duration::from_secs(1)).unwrap();
        let routing_config = crate::config::RoutingConfig::default();
        let routing = RoutingClient::new(client.clone(), &routing_config, "test-ak".to_string());

        let mut broken = listing("http://a", 0);
        broken.distance_text = "no delimiters here".to_string();
        assert!(enrich_listing(&client, &routing, broken).await.is_none());
    }
}
