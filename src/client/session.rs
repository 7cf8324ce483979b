use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Storage key of the admin flag (`"1"` or `"0"`)
pub const ADMIN_SESSION_KEY: &str = "isAdminSession";
/// Storage key of the last-activity timestamp (Unix milliseconds)
pub const ADMIN_SESSION_TIMESTAMP_KEY: &str = "adminSessionTimestamp";
/// Storage key of the admin token issued by the server
pub const ADMIN_SESSION_TOKEN_KEY: &str = "adminSessionToken";
/// Storage key of the admin token's expiry (Unix milliseconds)
pub const ADMIN_SESSION_TOKEN_EXPIRY_KEY: &str = "adminSessionTokenExpiry";

/// Inactivity window after which admin mode switches off
pub const ADMIN_SESSION_MINUTES: i64 = 30;
/// Period of the background validity check
pub const SESSION_CHECK_INTERVAL_SECS: i64 = 60;

/// Persistent string key/value store backing the admin session
/// (browser local storage, a file, or memory)
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    values: HashMap<String, String>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Result of a validity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheck {
    /// Still admin, or was never admin
    Unchanged,
    /// Admin mode just expired
    Expired,
}

/// Client-side admin mode with a sliding inactivity expiry
///
/// When the server issues a token, the session also ends no later than the
/// token's own expiry; renewing the token moves that bound forward.
#[derive(Debug)]
pub struct AdminSession<S: SessionStorage> {
    storage: S,
    active: bool,
    token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
    last_activity: Option<DateTime<Utc>>,
}

impl<S: SessionStorage> AdminSession<S> {
    /// Restore the session persisted in `storage`
    ///
    /// A stored session that is already past its window is cleared.
    pub fn restore(storage: S, now: DateTime<Utc>) -> Self {
        let flagged = storage.get(ADMIN_SESSION_KEY).as_deref() == Some("1");
        let last_activity = storage
            .get(ADMIN_SESSION_TIMESTAMP_KEY)
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);
        let token = storage.get(ADMIN_SESSION_TOKEN_KEY);
        let token_expires_at = storage
            .get(ADMIN_SESSION_TOKEN_EXPIRY_KEY)
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);

        let mut session = Self {
            storage,
            active: flagged && last_activity.is_some(),
            token,
            token_expires_at,
            last_activity,
        };

        if session.active && session.remaining(now) <= Duration::zero() {
            tracing::debug!("Stored admin session already expired");
            session.end();
        } else if !session.active {
            session.clear_storage();
        }

        session
    }

    /// Enter admin mode
    ///
    /// `expires_in` is the token lifetime in seconds as reported by the server.
    pub fn start(&mut self, token: Option<String>, expires_in: Option<i64>, now: DateTime<Utc>) {
        self.active = true;
        self.storage.set(ADMIN_SESSION_KEY, "1");
        self.set_token(token, expires_in, now);
        self.set_last_activity(now);
    }

    /// Swap in a renewed token and count the renewal as activity
    pub fn renew_token(&mut self, token: Option<String>, expires_in: Option<i64>, now: DateTime<Utc>) {
        if !self.active {
            return;
        }
        self.set_token(token, expires_in, now);
        self.set_last_activity(now);
    }

    /// Leave admin mode and forget the token
    pub fn end(&mut self) {
        self.active = false;
        self.token = None;
        self.token_expires_at = None;
        self.last_activity = None;
        self.clear_storage();
        self.storage.set(ADMIN_SESSION_KEY, "0");
    }

    /// Record admin activity, sliding the expiry window
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.active {
            self.set_last_activity(now);
        }
    }

    /// Expire the session if its window has passed
    ///
    /// Runs on the periodic tick and when the window regains focus.
    pub fn revalidate(&mut self, now: DateTime<Utc>) -> SessionCheck {
        if self.active && self.remaining(now) <= Duration::zero() {
            tracing::info!("Admin session expired");
            self.end();
            return SessionCheck::Expired;
        }
        SessionCheck::Unchanged
    }

    /// Time left before expiry; zero when not admin
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match (self.active, self.last_activity) {
            (true, Some(last)) => {
                let idle_limit = last + Duration::minutes(ADMIN_SESSION_MINUTES);
                let expires_at = match self.token_expires_at {
                    Some(token_exp) => idle_limit.min(token_exp),
                    None => idle_limit,
                };
                (expires_at - now).max(Duration::zero())
            }
            _ => Duration::zero(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.active
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn set_token(&mut self, token: Option<String>, expires_in: Option<i64>, now: DateTime<Utc>) {
        self.token_expires_at = token
            .as_ref()
            .and(expires_in)
            .map(|secs| now + Duration::seconds(secs));
        match &token {
            Some(token) => self.storage.set(ADMIN_SESSION_TOKEN_KEY, token),
            None => self.storage.remove(ADMIN_SESSION_TOKEN_KEY),
        }
        match self.token_expires_at {
            Some(exp) => self
                .storage
                .set(ADMIN_SESSION_TOKEN_EXPIRY_KEY, &exp.timestamp_millis().to_string()),
            None => self.storage.remove(ADMIN_SESSION_TOKEN_EXPIRY_KEY),
        }
        self.token = token;
    }

    fn set_last_activity(&mut self, now: DateTime<Utc>) {
        self.last_activity = Some(now);
        self.storage
            .set(ADMIN_SESSION_TIMESTAMP_KEY, &now.timestamp_millis().to_string());
    }

    fn clear_storage(&mut self) {
        self.storage.remove(ADMIN_SESSION_TIMESTAMP_KEY);
        self.storage.remove(ADMIN_SESSION_TOKEN_KEY);
        self.storage.remove(ADMIN_SESSION_TOKEN_EXPIRY_KEY);
    }
}
