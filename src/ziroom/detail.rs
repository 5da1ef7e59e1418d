use anyhow::{bail, Context, Result};
use scraper::Html;

use super::types::Listing;
use super::{pages, selector};

/// Fill in the display name and floor-plan image from a listing's detail
/// page. Any failure drops the listing, same as an extraction failure.
pub async fn enrich_from_detail_page(
    client: &reqwest::Client,
    listing: &mut Listing,
) -> Result<()> {
    let document = pages::fetch_document(client, &listing.detail_url).await?;
    let (name, floorplan_url) = parse_detail_page(&document)?;
    listing.name = name;
    listing.floorplan_url = floorplan_url;
    Ok(())
}

/// Display name and floor-plan image reference from a detail document.
///
/// Pages with several floor-plan images list historical plans first; the
/// last one is the current plan. A page without any floor-plan image is
/// still a valid listing.
pub fn parse_detail_page(document: &Html) -> Result<(String, Option<String>)> {
    let name_sel = selector("div.room_name h2")?;
    let name = document
        .select(&name_sel)
        .next()
        .context("Detail page has no room name")?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    if name.is_empty() {
        bail!("Detail page has an empty room name");
    }

    let plan_sel = selector("div.lidiv img")?;
    let floorplan_url = document
        .select(&plan_sel)
        .last()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    Ok((name, floorplan_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn test_parses_trimmed_name_and_last_floorplan() {
        let doc = document(
            r#"<div class="room_name"><h2>
                 鑫苑鑫都汇3居室-03卧
               </h2></div>
               <div class="lidiv"><img src="http://pic.ziroom.com/old.jpg"></div>
               <div class="lidiv"><img src="http://pic.ziroom.com/current.jpg"></div>"#,
        );
        let (name, floorplan) = parse_detail_page(&doc).unwrap();
        assert_eq!(name, "鑫苑鑫都汇3居室-03卧");
        assert_eq!(floorplan.as_deref(), Some("http://pic.ziroom.com/current.jpg"));
    }

    #[test]
    fn test_missing_floorplan_is_not_an_error() {
        let doc = document(r#"<div class="room_name"><h2>某小区2居室-01卧</h2></div>"#);
        let (name, floorplan) = parse_detail_page(&doc).unwrap();
        assert_eq!(name, "某小区2居室-01卧");
        assert!(floorplan.is_none());
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let doc = document(r#"<div class="lidiv"><img src="http://pic.ziroom.com/a.jpg"></div>"#);
        assert!(parse_detail_page(&doc).is_err());
    }

    #[test]
    fn test_blank_name_is_an_error() {
        let doc = document(r#"<div class="room_name"><h2>   </h2></div>"#);
        assert!(parse_detail_page(&doc).is_err());
    }
}
