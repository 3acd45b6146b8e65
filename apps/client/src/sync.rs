//! Reconciliation between the local save snapshot and the server-held
//! bookmark list. The snapshot is never the sole source of truth while the
//! network is reachable: the server list wins on refresh, and local toggles
//! are replayed best effort, kept locally even when the replay fails.

use tracing::warn;
use uuid::Uuid;

use crate::api::BookmarkApi;
use crate::snapshot::{PlaceSummary, SavedSnapshotStore, SavedState};

/// Replays one local toggle to the server. A failure is logged and the
/// optimistic local state stays as-is; the next refresh settles it.
pub async fn push_toggle(api: &dyn BookmarkApi, user_id: Uuid, place_id: Uuid, now_saved: bool) {
    let result = if now_saved {
        api.add_bookmark(user_id, place_id).await
    } else {
        api.remove_bookmark(user_id, place_id).await
    };
    if let Err(err) = result {
        warn!("bookmark replay for place {place_id} failed, keeping local state: {err}");
    }
}

/// Overwrites the local snapshot with the server list. Returns `None` when
/// the server is unreachable, leaving the snapshot untouched.
pub async fn refresh_from_server(
    store: &SavedSnapshotStore,
    api: &dyn BookmarkApi,
    user_id: Uuid,
) -> Option<SavedState> {
    match api.list_bookmarks(user_id).await {
        Ok(places) => Some(store.replace_saved_with_places(&places)),
        Err(err) => {
            warn!("bookmark refresh failed, keeping local snapshot: {err}");
            None
        }
    }
}

/// Toggles locally first, then replays the change to the server.
pub async fn toggle_and_sync(
    store: &SavedSnapshotStore,
    api: &dyn BookmarkApi,
    user_id: Uuid,
    place: &PlaceSummary,
) -> SavedState {
    let state = store.toggle_saved(place);
    let now_saved = state.items.iter().any(|it| it.place.id == place.id);
    push_toggle(api, user_id, place.id, now_saved).await;
    state
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct MockBookmarkApi {
        server: Mutex<Vec<PlaceSummary>>,
        unreachable: AtomicBool,
    }

    #[async_trait]
    impl BookmarkApi for MockBookmarkApi {
        async fn list_bookmarks(&self, _user_id: Uuid) -> Result<Vec<PlaceSummary>> {
            if self.unreachable.load(Ordering::SeqCst) {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.server.lock().unwrap().clone())
        }

        async fn add_bookmark(&self, _user_id: Uuid, place_id: Uuid) -> Result<()> {
            if self.unreachable.load(Ordering::SeqCst) {
                return Err(anyhow!("connection refused"));
            }
            let mut server = self.server.lock().unwrap();
            if !server.iter().any(|p| p.id == place_id) {
                server.push(place(place_id, "server copy"));
            }
            Ok(())
        }

        async fn remove_bookmark(&self, _user_id: Uuid, place_id: Uuid) -> Result<()> {
            if self.unreachable.load(Ordering::SeqCst) {
                return Err(anyhow!("connection refused"));
            }
            self.server.lock().unwrap().retain(|p| p.id != place_id);
            Ok(())
        }
    }

    fn place(id: Uuid, name: &str) -> PlaceSummary {
        PlaceSummary {
            id,
            name_ko: name.to_string(),
            name_ja: None,
            category: "cafe".to_string(),
            address: "서울".to_string(),
            lat: 37.56,
            lng: 126.98,
            solo_ok_level: None,
            solo_allowed: None,
        }
    }

    #[tokio::test]
    async fn test_toggle_replays_to_server() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        let api = MockBookmarkApi::default();
        let p = place(Uuid::new_v4(), "혼밥 라멘");

        toggle_and_sync(&store, &api, Uuid::new_v4(), &p).await;

        assert!(store.is_saved(p.id));
        assert_eq!(api.server.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_replay_keeps_local_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        let api = MockBookmarkApi::default();
        api.unreachable.store(true, Ordering::SeqCst);
        let p = place(Uuid::new_v4(), "offline cafe");

        toggle_and_sync(&store, &api, Uuid::new_v4(), &p).await;

        assert!(store.is_saved(p.id));
        assert!(api.server.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_lets_server_win() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        let api = MockBookmarkApi::default();

        store.toggle_saved(&place(Uuid::new_v4(), "stale local"));
        let server_place = place(Uuid::new_v4(), "server truth");
        api.server.lock().unwrap().push(server_place.clone());

        let state = refresh_from_server(&store, &api, Uuid::new_v4()).await;

        assert!(state.is_some());
        assert_eq!(store.saved_places(), vec![server_place]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedSnapshotStore::new(dir.path());
        let api = MockBookmarkApi::default();
        let p = place(Uuid::new_v4(), "kept");
        store.toggle_saved(&p);

        api.unreachable.store(true, Ordering::SeqCst);
        let state = refresh_from_server(&store, &api, Uuid::new_v4()).await;

        assert!(state.is_none());
        assert!(store.is_saved(p.id));
    }
}
