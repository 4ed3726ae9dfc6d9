//! Record load/save shared by the engines.
//!
//! Neither direction ever fails the calling operation: unreadable records
//! fall back to defaults and failed writes become [`Durability::Failed`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::events::{Durability, Event};
use crate::storage::KvStore;

/// Read and parse the record under `key`.
///
/// Returns `None` when nothing is stored or the blob cannot be used; the
/// latter also queues [`Event::StateRecovered`].
pub(crate) fn load_record<T, S>(store: &S, key: &str, events: &mut Vec<Event>) -> Option<T>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    let blob = match store.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!(key, error = %e, "failed to read record; starting fresh");
            events.push(Event::StateRecovered {
                key: key.to_string(),
                reason: e.to_string(),
            });
            return None;
        }
    };

    match serde_json::from_str(&blob) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed record; starting fresh");
            events.push(Event::StateRecovered {
                key: key.to_string(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Serialize and write `record` under `key`.
pub(crate) fn save_record<T, S>(
    store: &S,
    key: &str,
    record: &T,
    events: &mut Vec<Event>,
) -> Durability
where
    T: Serialize,
    S: KvStore + ?Sized,
{
    let result = serde_json::to_string(record)
        .map_err(|e| e.to_string())
        .and_then(|blob| store.save(key, &blob).map_err(|e| e.to_string()));

    match result {
        Ok(()) => Durability::Saved,
        Err(reason) => {
            tracing::error!(key, error = %reason, "failed to persist record");
            events.push(Event::PersistFailed {
                key: key.to_string(),
                reason: reason.clone(),
            });
            Durability::Failed { reason }
        }
    }
}
