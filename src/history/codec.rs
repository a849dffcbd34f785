//! Competition document codec and history-list operations.
//!
//! Encoding is plain serde_json. Decoding never propagates a fault past
//! this boundary: a malformed document yields `None` (or an empty list) and
//! a warning, missing or mistyped fields fall back to defaults, and every
//! decoded aggregate is normalized so no index dangles.
//!
//! The history list is keyed by `start_time` and kept sorted newest first.
//! Two competitions sharing a start second are indistinguishable here; that
//! matches the documents already on disk.

use serde_json::Value;

use crate::competition::Competition;

/// Encode a single competition document.
pub fn encode_competition(competition: &Competition) -> serde_json::Result<String> {
    serde_json::to_string(competition)
}

/// Decode a single competition document.
///
/// Returns `None` for unparseable input or a non-object top level; the
/// caller falls back to an empty in-memory state.
pub fn decode_competition(document: &str) -> Option<Competition> {
    let value: Value = match serde_json::from_str(document) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Discarding unparseable competition document: {err}");
            return None;
        }
    };
    if !value.is_object() {
        log::warn!("Discarding competition document with non-object top level");
        return None;
    }
    decode_value(value)
}

/// Encode the history array.
pub fn encode_history(history: &[Competition]) -> serde_json::Result<String> {
    serde_json::to_string(history)
}

/// Decode the history array, newest first.
///
/// A non-array top level yields an empty list; unreadable elements are
/// skipped.
pub fn decode_history(document: &str) -> Vec<Competition> {
    let value: Value = match serde_json::from_str(document) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Discarding unparseable history document: {err}");
            return Vec::new();
        }
    };
    let Value::Array(entries) = value else {
        log::warn!("Discarding history document with non-array top level");
        return Vec::new();
    };

    let mut history: Vec<Competition> = entries.into_iter().filter_map(decode_value).collect();
    sort_history(&mut history);
    history
}

/// Insert or replace a competition in the history list.
///
/// `start_time` is the identity key: an existing entry with the same start
/// time is replaced in place, otherwise the competition is appended. The
/// list is re-sorted newest first either way.
pub fn upsert(history: &mut Vec<Competition>, competition: Competition) {
    match history
        .iter_mut()
        .find(|entry| entry.start_time == competition.start_time)
    {
        Some(entry) => *entry = competition,
        None => history.push(competition),
    }
    sort_history(history);
}

/// Sort the history list descending by start time. The sort is stable, so
/// colliding start times keep their relative order.
pub fn sort_history(history: &mut [Competition]) {
    history.sort_by_key(|competition| std::cmp::Reverse(competition.start_time));
}

fn decode_value(value: Value) -> Option<Competition> {
    match serde_json::from_value::<Competition>(value) {
        Ok(mut competition) => {
            competition.normalize();
            Some(competition)
        }
        Err(err) => {
            log::warn!("Skipping undecodable competition entry: {err}");
            None
        }
    }
}
