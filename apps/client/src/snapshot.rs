//! Saved-places local snapshot.
//!
//! Online, the server-held bookmark list is authoritative and periodically
//! overwrites this snapshot; offline, the Saved view renders from it alone.
//! Toggles apply here immediately, reachable network or not, and are replayed
//! to the server by the sync layer.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kv;

/// Storage key for the snapshot; the file name is derived from it.
pub const SAVED_SNAPSHOT_KEY: &str = "hitoriok:saved:v1";

const SNAPSHOT_VERSION: u32 = 1;

/// Compact place view mirroring the server's bookmark list entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub id: Uuid,
    pub name_ko: String,
    #[serde(default)]
    pub name_ja: Option<String>,
    pub category: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub solo_ok_level: Option<String>,
    #[serde(default)]
    pub solo_allowed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItem {
    pub place: PlaceSummary,
    /// Milliseconds since the epoch, matching `updated_at`.
    pub saved_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    pub items: Vec<SavedItem>,
    pub updated_at: i64,
}

impl SavedState {
    fn empty() -> Self {
        SavedState {
            version: SNAPSHOT_VERSION,
            items: Vec::new(),
            updated_at: now_ms(),
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub struct SavedSnapshotStore {
    dir: PathBuf,
}

impl SavedSnapshotStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Loads the snapshot. Missing, corrupt or version-mismatched data yields
    /// an empty state, never an error.
    pub fn load(&self) -> SavedState {
        let raw = match kv::get_item(&self.dir, SAVED_SNAPSHOT_KEY) {
            Some(raw) => raw,
            None => return SavedState::empty(),
        };
        match serde_json::from_str::<SavedState>(&raw) {
            Ok(state) if state.version == SNAPSHOT_VERSION => state,
            _ => SavedState::empty(),
        }
    }

    fn persist(&self, state: &SavedState) {
        match serde_json::to_string(state) {
            Ok(json) => kv::set_item(&self.dir, SAVED_SNAPSHOT_KEY, &json),
            Err(err) => tracing::warn!("saved snapshot serialize failed: {err}"),
        }
    }

    pub fn is_saved(&self, place_id: Uuid) -> bool {
        self.load().items.iter().any(|it| it.place.id == place_id)
    }

    /// Removes the place if present, otherwise prepends it. The mutation is
    /// applied optimistically and immediately, independent of reachability.
    pub fn toggle_saved(&self, place: &PlaceSummary) -> SavedState {
        let state = self.load();
        let exists = state.items.iter().any(|it| it.place.id == place.id);

        let items: Vec<SavedItem> = if exists {
            state
                .items
                .into_iter()
                .filter(|it| it.place.id != place.id)
                .collect()
        } else {
            let mut items = vec![SavedItem {
                place: place.clone(),
                saved_at: now_ms(),
            }];
            items.extend(state.items);
            items
        };

        let next = SavedState {
            version: SNAPSHOT_VERSION,
            items,
            updated_at: now_ms(),
        };
        self.persist(&next);
        next
    }

    /// Full overwrite from the server-held bookmark list; only called when
    /// that list is authoritative and reachable.
    pub fn replace_saved_with_places(&self, places: &[PlaceSummary]) -> SavedState {
        let now = now_ms();
        let next = SavedState {
            version: SNAPSHOT_VERSION,
            items: places
                .iter()
                .cloned()
                .map(|place| SavedItem {
                    place,
                    saved_at: now,
                })
                .collect(),
            updated_at: now,
        };
        self.persist(&next);
        next
    }

    pub fn saved_places(&self) -> Vec<PlaceSummary> {
        self.load().items.into_iter().map(|it| it.place).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv;

    fn place(name: &str) -> PlaceSummary {
        PlaceSummary {
            id: Uuid::new_v4(),
            name_ko: name.to_string(),
            name_ja: None,
            category: "ramen".to_string(),
            address: "서울 중구".to_string(),
            lat: 37.5596,
            lng: 126.9851,
            solo_ok_level: Some("HIGH".to_string()),
            solo_allowed: Some("YES".to_string()),
        }
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        let p = place("혼밥식당");

        assert!(!store.is_saved(p.id));
        store.toggle_saved(&p);
        assert!(store.is_saved(p.id));
        store.toggle_saved(&p);
        assert!(!store.is_saved(p.id));
    }

    #[test]
    fn test_new_saves_are_prepended() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        let first = place("first");
        let second = place("second");

        store.toggle_saved(&first);
        let state = store.toggle_saved(&second);

        assert_eq!(state.items[0].place.id, second.id);
        assert_eq!(state.items[1].place.id, first.id);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let p = place("단골집");

        SavedSnapshotStore::new(dir.path()).toggle_saved(&p);

        let reopened = SavedSnapshotStore::new(dir.path());
        assert!(reopened.is_saved(p.id));
        assert_eq!(reopened.saved_places(), vec![p]);
    }

    #[test]
    fn test_corrupt_snapshot_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        kv::set_item(dir.path(), SAVED_SNAPSHOT_KEY, "{not json");

        let store = SavedSnapshotStore::new(dir.path());
        assert!(store.load().items.is_empty());
    }

    #[test]
    fn test_version_mismatch_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        let mut state = store.toggle_saved(&place("old"));
        state.version = 2;
        kv::set_item(
            dir.path(),
            SAVED_SNAPSHOT_KEY,
            &serde_json::to_string(&state).unwrap(),
        );

        assert!(store.load().items.is_empty());
    }

    #[test]
    fn test_replace_overwrites_local_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        store.toggle_saved(&place("stale local"));

        let server_list = vec![place("server a"), place("server b")];
        let state = store.replace_saved_with_places(&server_list);

        assert_eq!(state.items.len(), 2);
        assert_eq!(store.saved_places(), server_list);
    }
}
