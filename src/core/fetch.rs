use crate::core::client::ShopifyClient;
use crate::domain::model::{FetchOutcome, RawObject, ResourceKind, Termination};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Per-run fetch parameters. `status` is only set for orders.
#[derive(Debug, Clone)]
pub struct FetchParams {
    pub limit: u32,
    pub status: Option<String>,
    pub page_delay: Duration,
}

/// Outcome of inspecting one Link header for the next-page cursor.
#[derive(Debug, PartialEq, Eq)]
enum NextCursor {
    /// No rel="next" relation: the stream is exhausted.
    None,
    /// rel="next" present but no page_info parameter could be extracted.
    Unparsable,
    Cursor(String),
}

/// Follows cursor-based pagination until exhausted, pausing `page_delay`
/// between consecutive page fetches. Request errors end the loop: they are
/// logged and reported through the outcome, records from prior pages kept.
pub async fn fetch_all(
    client: &ShopifyClient,
    kind: ResourceKind,
    params: &FetchParams,
) -> FetchOutcome {
    let mut records: Vec<RawObject> = Vec::new();
    let mut pages = 0usize;
    let mut page_info: Option<String> = None;

    let termination = loop {
        let mut query: Vec<(&str, String)> = vec![("limit", params.limit.to_string())];
        if let Some(status) = &params.status {
            query.push(("status", status.clone()));
        }
        if let Some(cursor) = &page_info {
            query.push(("page_info", cursor.clone()));
        }

        let page = match client.fetch_page(kind, &query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("❌ Error fetching {}: {}", kind, e);
                break Termination::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let items = page
            .body
            .get(kind.plural_key())
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        if items.is_empty() {
            break Termination::Exhausted;
        }

        pages += 1;
        records.extend(
            items
                .into_iter()
                .filter_map(|item| item.as_object().cloned()),
        );
        tracing::debug!("📡 {}: page {} fetched, {} records so far", kind, pages, records.len());

        match next_page_cursor(page.link_header.as_deref()) {
            NextCursor::None => break Termination::Exhausted,
            NextCursor::Unparsable => break Termination::CursorUnparsable,
            NextCursor::Cursor(cursor) => page_info = Some(cursor),
        }

        // Rate limiting - Shopify allows 2 requests per second
        tokio::time::sleep(params.page_delay).await;
    };

    tracing::info!(
        "📡 {}: fetched {} records over {} pages ({})",
        kind,
        records.len(),
        pages,
        termination
    );

    FetchOutcome {
        records,
        pages,
        termination,
    }
}

fn page_info_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"page_info=([^&>]+)").expect("valid regex"))
}

/// Extracts the next-page cursor from a Link header value.
///
/// Header format: `<url>; rel="previous", <url>; rel="next"`. Only the
/// rel="next" entry is followed; its page_info query parameter is the cursor.
fn next_page_cursor(link_header: Option<&str>) -> NextCursor {
    let Some(header) = link_header else {
        return NextCursor::None;
    };

    for part in header.split(',') {
        let part = part.trim();
        let mut url = None;
        let mut is_next = false;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel) = segment.strip_prefix("rel=") {
                is_next = rel.trim_matches('"') == "next";
            }
        }

        if is_next {
            return match url
                .and_then(|u| page_info_regex().captures(u))
                .and_then(|caps| caps.get(1))
            {
                Some(m) => NextCursor::Cursor(m.as_str().to_string()),
                None => NextCursor::Unparsable,
            };
        }
    }

    NextCursor::None
}
