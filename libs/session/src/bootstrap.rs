use anyhow::Result;
use tracing::{info, warn};

use api::response::LoginResponse;

use crate::store::KeyValueStore;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_DATA_KEY: &str = "user_data";

/// A logged in user: the access token and the account summary returned at login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account: LoginResponse,
}

/// Restores the last session from `store`.
///
/// A token without a cached account summary is stale and gets cleared, as does a summary
/// without a token or a summary that no longer parses.
pub fn restore<S: KeyValueStore>(store: &mut S) -> Result<Option<Session>> {
    let token = store.get(TOKEN_KEY)?;
    let user_data = store.get(USER_DATA_KEY)?;

    match (token, user_data) {
        (Some(token), Some(user_data)) => match serde_json::from_str::<LoginResponse>(&user_data) {
            Ok(account) => {
                info!("session restored");
                Ok(Some(Session { token, account }))
            }
            Err(e) => {
                warn!("cached account summary is unreadable, clearing session: {}", e);
                logout(store)?;
                Ok(None)
            }
        },
        (Some(_), None) => {
            warn!("stale token without account summary, clearing");
            store.clear(TOKEN_KEY)?;
            Ok(None)
        }
        (None, Some(_)) => {
            warn!("account summary without token, clearing");
            store.clear(USER_DATA_KEY)?;
            Ok(None)
        }
        (None, None) => Ok(None),
    }
}

pub fn save<S: KeyValueStore>(store: &mut S, token: &str, account: &LoginResponse) -> Result<()> {
    store.set(TOKEN_KEY, token)?;
    store.set(USER_DATA_KEY, &serde_json::to_string(account)?)?;
    Ok(())
}

pub fn logout<S: KeyValueStore>(store: &mut S) -> Result<()> {
    store.clear(TOKEN_KEY)?;
    store.clear(USER_DATA_KEY)?;
    Ok(())
}
