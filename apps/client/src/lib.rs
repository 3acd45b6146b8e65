//! Client runtime for HitoriOk: the offline-first saved-places snapshot,
//! anonymous identity and language preference, the HTTP client for the
//! backend API, best-effort bookmark sync, and the per-route cache worker.

pub mod api;
pub mod identity;
mod kv;
pub mod offline;
pub mod prefs;
pub mod snapshot;
pub mod sync;
