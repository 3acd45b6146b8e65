//! Anonymous client identity: a locally minted user id and a "member since"
//! date, cached under two fixed keys so reports and bookmarks stay attributed
//! to the same user across sessions.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::kv;

pub const USER_ID_KEY: &str = "hitoriok:anon-user-id";
pub const MEMBER_SINCE_KEY: &str = "hitoriok:member-since";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_id: Uuid,
    pub member_since: NaiveDate,
}

/// Returns the cached identity, minting the missing pieces on first run.
/// A surviving user id is kept even if the member-since date was lost.
pub fn ensure_identity(dir: &Path) -> ClientIdentity {
    let cached_id = kv::get_item(dir, USER_ID_KEY).and_then(|raw| raw.trim().parse::<Uuid>().ok());
    let cached_since = kv::get_item(dir, MEMBER_SINCE_KEY)
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok());

    if let (Some(user_id), Some(member_since)) = (cached_id, cached_since) {
        return ClientIdentity {
            user_id,
            member_since,
        };
    }

    let identity = ClientIdentity {
        user_id: cached_id.unwrap_or_else(Uuid::new_v4),
        member_since: cached_since.unwrap_or_else(|| Utc::now().date_naive()),
    };
    kv::set_item(dir, USER_ID_KEY, &identity.user_id.to_string());
    kv::set_item(
        dir,
        MEMBER_SINCE_KEY,
        &identity.member_since.format(DATE_FORMAT).to_string(),
    );
    identity
}
