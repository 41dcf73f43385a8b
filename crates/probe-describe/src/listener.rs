//! Extraction of event listener entries.

use probe_model::ListenerRegistry;

use crate::callable::{CallableRecord, normalize};
use crate::error::DescribeError;

/// One listener of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerEntry {
    /// 1-based position in the registry's order for the event.
    pub order: usize,
    pub callable: CallableRecord,
    pub priority: i32,
}

/// Listeners of one event, or of every event grouped by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerGroups {
    /// Listeners of a single event.
    Single {
        event: String,
        entries: Vec<ListenerEntry>,
    },
    /// Every event, sorted by name.
    Grouped(Vec<(String, Vec<ListenerEntry>)>),
}

/// Entries for the listeners of `event`, in registry order.
///
/// # Errors
///
/// Returns an error if a listener cannot be normalized.
pub fn extract_one(
    registry: &dyn ListenerRegistry,
    event: &str,
) -> Result<Vec<ListenerEntry>, DescribeError> {
    registry
        .listeners(event)
        .into_iter()
        .enumerate()
        .map(|(index, (listener, priority))| {
            Ok(ListenerEntry {
                order: index + 1,
                callable: normalize(listener)?,
                priority,
            })
        })
        .collect()
}

/// Entries for every event, sorted by event name.
///
/// # Errors
///
/// Returns an error if a listener cannot be normalized.
pub fn extract_all(
    registry: &dyn ListenerRegistry,
) -> Result<Vec<(String, Vec<ListenerEntry>)>, DescribeError> {
    let mut events: Vec<&str> = registry
        .all_listeners()
        .into_iter()
        .map(|(event, _)| event)
        .collect();
    events.sort_unstable();
    events.dedup();

    events
        .into_iter()
        .map(|event| Ok((event.to_owned(), extract_one(registry, event)?)))
        .collect()
}

/// Extract one event when `event` is given, every event otherwise.
///
/// # Errors
///
/// Returns an error if a listener cannot be normalized.
pub fn extract(
    registry: &dyn ListenerRegistry,
    event: Option<&str>,
) -> Result<ListenerGroups, DescribeError> {
    Ok(match event {
        Some(event) => ListenerGroups::Single {
            event: event.to_owned(),
            entries: extract_one(registry, event)?,
        },
        None => ListenerGroups::Grouped(extract_all(registry)?),
    })
}
