//! Gives each browser its own dashboard session.
//!
//! A visitor is identified by an encrypted cookie holding a visitor ID. The ID
//! keys the visitor's [DashboardSession], so one visitor's selection never
//! shows up on another visitor's page.

use std::{
    collections::HashMap,
    fmt::Display,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::dashboard::session::DashboardSession;

/// The name of the cookie that holds the visitor ID.
pub(crate) const COOKIE_VISITOR_ID: &str = "visitor_id";

/// Identifies one visitor's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct VisitorId(u64);

impl Display for VisitorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The dashboard sessions of every current visitor.
///
/// Cloning gives another handle to the same sessions.
#[derive(Debug, Clone)]
pub struct VisitorSessions {
    visitors: Arc<Mutex<VisitorMap>>,
    idle_timeout: Duration,
}

#[derive(Debug, Default)]
struct VisitorMap {
    last_id: u64,
    sessions: HashMap<VisitorId, VisitorEntry>,
}

#[derive(Debug)]
struct VisitorEntry {
    session: DashboardSession,
    last_seen: Instant,
}

impl VisitorSessions {
    /// Sessions not used for this long are forgotten.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

    /// Create an empty store that forgets sessions after `idle_timeout`
    /// without a request.
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            visitors: Arc::default(),
            idle_timeout,
        }
    }

    /// The session of the visitor whose cookie is in `jar`.
    ///
    /// Visitors without a cookie, or whose session has been forgotten, get a
    /// new session with the default selection. The returned jar then carries
    /// the cookie for the new session and must be sent with the response.
    pub fn session_for(&self, jar: PrivateCookieJar) -> (PrivateCookieJar, DashboardSession) {
        let now = Instant::now();
        let mut visitors = self.lock();
        visitors.forget_idle(now, self.idle_timeout);

        let existing = get_visitor_id_from_cookie(&jar)
            .and_then(|visitor_id| visitors.sessions.get_mut(&visitor_id));
        if let Some(entry) = existing {
            entry.last_seen = now;
            return (jar, entry.session.clone());
        }

        visitors.last_id += 1;
        let visitor_id = VisitorId(visitors.last_id);
        let session = DashboardSession::default();
        visitors.sessions.insert(
            visitor_id,
            VisitorEntry {
                session: session.clone(),
                last_seen: now,
            },
        );
        let active = visitors.sessions.len();
        drop(visitors);

        tracing::debug!("started dashboard session for visitor {visitor_id}, {active} active");

        (set_visitor_cookie(jar, visitor_id), session)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    fn lock(&self) -> MutexGuard<'_, VisitorMap> {
        // The map is left consistent between statements, so a panic while the
        // lock was held does not invalidate it.
        self.visitors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for VisitorSessions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_IDLE_TIMEOUT)
    }
}

impl VisitorMap {
    fn forget_idle(&mut self, now: Instant, idle_timeout: Duration) {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.duration_since(entry.last_seen) < idle_timeout);

        let forgotten = before - self.sessions.len();
        if forgotten > 0 {
            tracing::debug!("forgot {forgotten} idle dashboard session(s)");
        }
    }
}

/// Add the visitor cookie for `visitor_id` to `jar`.
///
/// The cookie lasts for the browser session. The app is served over plain
/// HTTP, so the cookie is not marked secure.
fn set_visitor_cookie(jar: PrivateCookieJar, visitor_id: VisitorId) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_VISITOR_ID, visitor_id.0.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict),
    )
}

fn get_visitor_id_from_cookie(jar: &PrivateCookieJar) -> Option<VisitorId> {
    let cookie = jar.get(COOKIE_VISITOR_ID)?;

    cookie.value_trimmed().parse().ok().map(VisitorId)
}
