//! Shareable text form of a position.
//!
//! A location is a query string (`q=shoe&category=mens-shirts&page=3`),
//! optionally wrapped as `aisle://catalog?...`. Only the well-known keys are
//! written, always in the same order, and defaults are left out, so equal
//! positions encode to equal text.

use aisle_engine::navigation::{CATEGORY_PARAM, PAGE_PARAM, QUERY_PARAM};
use aisle_engine::PositionParams;
use reqwest::Url;

const SCHEME: &str = "aisle";
const HOST: &str = "catalog";
const KEY_ORDER: [&str; 3] = [QUERY_PARAM, CATEGORY_PARAM, PAGE_PARAM];

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("not an aisle link: {0}")]
    Scheme(String),

    #[error("malformed link {text:?}: {reason}")]
    Malformed { text: String, reason: String },
}

/// `q=...&category=...&page=...` with empty values left out.
pub fn encode(params: &PositionParams) -> Result<String, LocationError> {
    let mut url = base()?;
    {
        let mut pairs = url.query_pairs_mut();
        for key in KEY_ORDER {
            if let Some(value) = params.get(key).filter(|v| !v.is_empty()) {
                pairs.append_pair(key, value);
            }
        }
    }
    Ok(url.query().unwrap_or_default().to_string())
}

/// `aisle://catalog?...`, or the bare link for the default position.
pub fn deep_link(params: &PositionParams) -> Result<String, LocationError> {
    let query = encode(params)?;
    if query.is_empty() {
        Ok(format!("{SCHEME}://{HOST}"))
    } else {
        Ok(format!("{SCHEME}://{HOST}?{query}"))
    }
}

/// Accepts a bare query string, one with a leading `?`, or a full link.
///
/// Unknown keys are kept; the navigation layer ignores them. Keys with empty
/// values are dropped. A repeated key keeps its last value.
pub fn decode(text: &str) -> Result<PositionParams, LocationError> {
    let text = text.trim();
    let url = if text.contains("://") {
        let url = parse(text)?;
        if url.scheme() != SCHEME {
            return Err(LocationError::Scheme(text.to_string()));
        }
        url
    } else {
        let mut url = base()?;
        url.set_query(Some(text.trim_start_matches('?')));
        url
    };

    Ok(url
        .query_pairs()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}

fn parse(text: &str) -> Result<Url, LocationError> {
    Url::parse(text).map_err(|err| LocationError::Malformed {
        text: text.to_string(),
        reason: err.to_string(),
    })
}

fn base() -> Result<Url, LocationError> {
    parse(&format!("{SCHEME}://{HOST}"))
}
