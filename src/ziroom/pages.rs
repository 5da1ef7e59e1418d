use anyhow::{Context, Result};
use scraper::Html;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::selector;

/// Fetch a URL and parse the body as an HTML document, retrying transient
/// failures with exponential backoff.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Html> {
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(3);

    let body = Retry::spawn(retry_strategy, || async {
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?;
        let response = response
            .error_for_status()
            .with_context(|| format!("Server rejected request: {}", url))?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body: {}", url))
    })
    .await?;

    Ok(Html::parse_document(&body))
}

/// Fetch one index page of a search query. `page` is 1-based.
pub async fn fetch_index_page(
    client: &reqwest::Client,
    base_url: &str,
    page: u32,
) -> Result<Html> {
    let url = format!("{}?p={}", base_url, page);
    fetch_document(client, &url).await
}

/// Fetch the first index page of a query and read its page count.
pub async fn resolve_page_count(client: &reqwest::Client, base_url: &str) -> Result<u32> {
    let document = fetch_document(client, base_url).await?;
    page_count(&document)
}

/// Number of index pages for a search query.
///
/// The indicator renders as `"<current>/<total>"`. A result set that fits
/// on one page has no indicator at all; that is the single-page case, not
/// an error.
pub fn page_count(document: &Html) -> Result<u32> {
    let pagenum = selector("span.pagenum")?;
    let Some(span) = document.select(&pagenum).next() else {
        return Ok(1);
    };
    let text: String = span.text().collect();
    let total = text
        .split('/')
        .nth(1)
        .with_context(|| format!("Malformed page indicator: {:?}", text.trim()))?;
    total
        .trim()
        .parse()
        .with_context(|| format!("Malformed page indicator: {:?}", text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn test_page_count_from_indicator() {
        let doc = document(r#"<span class="pagenum">1/12</span>"#);
        assert_eq!(page_count(&doc).unwrap(), 12);
    }

    #[test]
    fn test_page_count_reads_nested_text() {
        let doc = document(r#"<span class="pagenum"><b>2</b>/3</span>"#);
        assert_eq!(page_count(&doc).unwrap(), 3);
    }

    #[test]
    fn test_missing_indicator_means_single_page() {
        let doc = document("<div>no pagination here</div>");
        assert_eq!(page_count(&doc).unwrap(), 1);
    }

    #[test]
    fn test_indicator_without_separator_is_error() {
        let doc = document(r#"<span class="pagenum">7</span>"#);
        assert!(page_count(&doc).is_err());
    }

    #[test]
    fn test_indicator_with_garbage_total_is_error() {
        let doc = document(r#"<span class="pagenum">1/x</span>"#);
        assert!(page_count(&doc).is_err());
    }
}
