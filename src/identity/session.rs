use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use base64::Engine;
use parking_lot::RwLock;
use crate::tprintln;

use super::principal::Principal;

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub principal: Principal,
    pub issued_at: Instant,
    pub expires_at: Instant,
}

fn gen_id() -> String {
    // 256-bit random identifier, base64url without padding
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).expect("OS entropy source unavailable");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// In-memory session store. Cloning shares the underlying map, so one
/// manager handle can be held by the router state and every request sees the
/// same sessions. No persistence: a process restart invalidates everything.
#[derive(Clone)]
pub struct SessionManager {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(24 * 60 * 60))
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub fn issue(&self, principal: Principal) -> Session {
        let now = Instant::now();
        let sess = Session {
            session_id: gen_id(),
            principal,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        {
            let mut m = self.sessions.write();
            m.insert(sess.session_id.clone(), sess.clone());
        }
        tprintln!("session.issue principal={:?} ttl_secs={}", principal, self.ttl.as_secs());
        sess
    }

    /// Look up a session id. Unknown or expired ids resolve to `None`;
    /// expired entries are dropped on the way out.
    pub fn resolve(&self, session_id: &str) -> Option<Principal> {
        let now = Instant::now();
        let mut drop_key: Option<String> = None;
        let out = {
            let map = self.sessions.read();
            match map.get(session_id) {
                Some(sess) if sess.expires_at > now => Some(sess.principal),
                Some(_) => {
                    drop_key = Some(session_id.to_string());
                    None
                }
                None => None,
            }
        };
        if let Some(k) = drop_key {
            self.sessions.write().remove(&k);
        }
        out
    }

    /// Remove a session. Returns whether a record was actually dropped.
    pub fn destroy(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().remove(session_id).is_some();
        if removed {
            tprintln!("session.destroy sid={}", session_id);
        }
        removed
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }
}
