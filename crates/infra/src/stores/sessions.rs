use std::collections::HashMap;
use std::sync::RwLock;

use barstock_core::{LocationId, Period, SessionId};
use barstock_ledger::CountingSession;
use barstock_reports::SessionSource;

/// Counting sessions keyed by id, open and closed alike.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct MemorySessions {
    sessions: RwLock<HashMap<SessionId, CountingSession>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session. Closing replaces the open session with
    /// its closed successor under the same id.
    pub fn upsert(&self, session: CountingSession) {
        if let Ok(mut map) = self.sessions.write() {
            map.insert(session.id(), session);
        }
    }

    pub fn get(&self, session_id: SessionId) -> Option<CountingSession> {
        let map = self.sessions.read().ok()?;
        map.get(&session_id).cloned()
    }
}

impl SessionSource for MemorySessions {
    fn closed_in_period(&self, location_id: LocationId, period: Period) -> Vec<CountingSession> {
        let map = match self.sessions.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut sessions: Vec<CountingSession> = map
            .values()
            .filter(|s| s.location_id() == location_id)
            .filter(|s| {
                s.closed_at()
                    .map_or(false, |closed| period.overlaps(s.opened_at(), closed))
            })
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.opened_at());
        sessions
    }

    fn recent_closed(&self, location_id: LocationId, limit: usize) -> Vec<CountingSession> {
        let map = match self.sessions.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut closed: Vec<CountingSession> = map
            .values()
            .filter(|s| s.location_id() == location_id && s.is_closed())
            .cloned()
            .collect();
        closed.sort_by_key(|s| s.closed_at());
        closed.reverse();
        closed.truncate(limit);
        closed
    }
}
