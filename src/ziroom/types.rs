/// One rentable room scraped from an index page.
///
/// Fields fill in progressively as the record moves through the pipeline:
/// the extractor populates the labels and URLs, the commute and detail
/// enrichers fill `commute_minutes`, `name` and `floorplan_url`, and the
/// scorer assigns `score` once the full accepted set is known.
#[derive(Debug, Clone)]
pub struct Listing {
    pub detail_url: String,
    pub room_label: String,            // e.g. "3室1厅"
    pub size_label: String,            // e.g. "10 ㎡"
    pub rent_label: String,            // e.g. "￥ 2800 (每月)"
    pub distance_text: String,         // raw metro distance text from the card
    pub commute_minutes: u32,          // filled by commute enrichment
    pub name: String,                  // filled by detail enrichment
    pub floorplan_url: Option<String>, // filled by detail enrichment
    pub score: f64,                    // filled by scoring
}
