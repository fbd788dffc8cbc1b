/// Shareable state: base fields of every entry as a percent-encoded JSON
/// array of `{"n", "a", "d", "p"}` records, carried in the `data` query
/// parameter of a link.
///
/// Decoding never raises to the caller. A malformed payload means "no data".
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::SHARE_QUERY_PARAM;
use crate::error::{DecodeError, PizzaError, Result};
use crate::types::{Entry, EntryId, EntryInput};

/// One record of the share payload. Short field names keep links small.
#[derive(Debug, Serialize, Deserialize)]
struct SharedEntry {
    /// name
    n: String,
    /// quantity
    a: u32,
    /// diameter
    d: f64,
    /// unit price
    p: f64,
}

impl From<&Entry> for SharedEntry {
    fn from(entry: &Entry) -> Self {
        SharedEntry {
            n: entry.name().to_string(),
            a: entry.quantity(),
            d: entry.diameter(),
            p: entry.unit_price(),
        }
    }
}

impl From<SharedEntry> for EntryInput {
    fn from(shared: SharedEntry) -> Self {
        EntryInput::new(shared.n, shared.a, shared.d, shared.p)
    }
}

/// Encode the base fields of `entries`. `None` when there is nothing to share.
pub fn encode(entries: &[Entry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let records: Vec<SharedEntry> = entries.iter().map(SharedEntry::from).collect();
    // A Vec of plain structs with string/number fields always serializes.
    let json = serde_json::to_string(&records).ok()?;
    Some(urlencoding::encode(&json).into_owned())
}

/// Percent-decode and parse a payload into validated base fields.
pub fn try_decode(text: &str) -> std::result::Result<Vec<EntryInput>, DecodeError> {
    let json = urlencoding::decode(text.trim())?;
    let records: Vec<SharedEntry> = serde_json::from_str(&json)?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let input = EntryInput::from(record);
            input
                .validate()
                .map(|()| input)
                .map_err(|source| DecodeError::Record { index, source })
        })
        .collect()
}

/// Rebuild full entries from a payload produced by [`encode`].
///
/// Entries get ids `0..n` in payload order; a store adopting them re-stamps
/// ids from its own counter. Any failure is logged and yields `None`.
pub fn decode(text: &str) -> Option<Vec<Entry>> {
    let inputs = match try_decode(text) {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring undecodable shared state");
            return None;
        }
    };

    let mut entries = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
        // Already validated by try_decode.
        let entry = Entry::new(EntryId(i as u64), input).ok()?;
        entries.push(entry);
    }
    Some(entries)
}

/// Build `base_url` with its query replaced by `data=<encoded entries>`.
///
/// `Ok(None)` when there is nothing to share.
pub fn share_link(base_url: &str, entries: &[Entry]) -> Result<Option<String>> {
    let mut url = Url::parse(base_url).map_err(|source| PizzaError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;

    let Some(encoded) = encode(entries) else {
        return Ok(None);
    };

    url.set_query(Some(&format!("{SHARE_QUERY_PARAM}={encoded}")));
    Ok(Some(url.to_string()))
}

/// Find the still-encoded payload in `text`.
///
/// Accepts a full link (`https://host/?data=…`), a bare query string
/// (`?data=…&x=1` or `data=…`), or the payload itself.
pub fn payload_from_link(text: &str) -> Option<&str> {
    let text = text.trim();
    let prefix = format!("{SHARE_QUERY_PARAM}=");

    let query = match text.split_once('?') {
        Some((_, query)) => query,
        None if text.starts_with(&prefix) => text,
        None => return Some(text).filter(|t| !t.is_empty()),
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
        .filter(|value| !value.is_empty())
}

/// Extract and decode the payload of a share link. `None` if the link carries
/// no payload or the payload is malformed.
pub fn decode_link(text: &str) -> Option<Vec<Entry>> {
    let Some(payload) = payload_from_link(text) else {
        tracing::debug!("no shared state in link");
        return None;
    };
    decode(payload)
}
