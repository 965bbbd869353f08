use crate::player::PlaybackState;
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

pub const COOKIE_NAME: &str = "turadio_sesion";
const ID_LEN: usize = 24;

struct Session {
    state: PlaybackState,
    last_seen: Instant,
}

/// Playback state per browser session, keyed by the session cookie.
pub struct SessionStore {
    inner: Mutex<HashMap<String, Session>>,
    idle: Duration,
}

impl SessionStore {
    pub fn new(idle: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            idle,
        }
    }

    pub async fn snapshot(&self, id: &str) -> Option<PlaybackState> {
        let mut map = self.inner.lock().await;
        let session = map.get_mut(id)?;
        session.last_seen = Instant::now();
        Some(session.state.clone())
    }

    /// Runs `f` on the session's state, creating the session when `id` is
    /// absent or unknown. Returns the id actually used.
    pub async fn update<R>(
        &self,
        id: Option<&str>,
        f: impl FnOnce(&mut PlaybackState) -> R,
    ) -> (String, R) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        let id = match id.filter(|id| map.contains_key(*id)) {
            Some(id) => id.to_string(),
            None => {
                let idle = self.idle;
                map.retain(|_, s| now.duration_since(s.last_seen) < idle);
                debug!(sessions = map.len() + 1, "new playback session");
                new_session_id()
            }
        };
        let session = map.entry(id.clone()).or_insert_with(|| Session {
            state: PlaybackState::default(),
            last_seen: now,
        });
        session.last_seen = now;
        let out = f(&mut session.state);
        (id, out)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

pub fn new_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

pub fn session_cookie(id: &str) -> String {
    format!("{COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Session id from a raw `Cookie` header value.
pub fn session_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value.trim())
        .filter(|v| v.len() == ID_LEN && v.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_alphanumeric() {
        let id = new_session_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, new_session_id());
    }

    #[test]
    fn reads_cookie_header() {
        let id = "abcdefghijklmnopqrstuvwx";
        let header = format!("theme=dark; {COOKIE_NAME}={id}; other=1");
        assert_eq!(session_from_cookie_header(&header), Some(id));
        assert_eq!(session_from_cookie_header("theme=dark"), None);
        assert_eq!(session_from_cookie_header(&format!("{COOKIE_NAME}=short")), None);
        assert_eq!(
            session_from_cookie_header(&format!("{COOKIE_NAME}=abcdefghijklmnopqrstuv/x")),
            None
        );
    }

    #[tokio::test]
    async fn update_creates_then_reuses() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, _) = store.update(None, |st| st.report("x")).await;
        assert_eq!(store.len().await, 1);

        let (same, err) = store
            .update(Some(&id), |st| st.error().map(String::from))
            .await;
        assert_eq!(same, id);
        assert_eq!(err.as_deref(), Some("x"));

        let (other, _) = store.update(Some("unknown"), |_| ()).await;
        assert_ne!(other, id);
        assert!(store.snapshot("unknown").await.is_none());
        assert!(store.snapshot(&id).await.is_some());
    }

    #[tokio::test]
    async fn prunes_idle_sessions() {
        let store = SessionStore::new(Duration::ZERO);
        store.update(None, |_| ()).await;
        store.update(None, |_| ()).await;
        assert_eq!(store.len().await, 1);
    }
}
