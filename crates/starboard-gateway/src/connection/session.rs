//! Session state shared across reconnects
//!
//! A session survives a dropped socket: reconnecting with its id and the last
//! sequence number resumes it and replays missed events.

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Inner {
    session_id: Option<String>,
    resume_url: Option<String>,
    sequence: Option<u64>,
}

/// Resume information for the current gateway session
#[derive(Debug, Default)]
pub struct SessionState {
    inner: Mutex<Inner>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new session from READY
    pub fn start(&self, session_id: impl Into<String>, resume_url: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.session_id = Some(session_id.into());
        inner.resume_url = Some(resume_url.into());
        tracing::info!(session_id = ?inner.session_id, "Gateway session started");
    }

    /// Track the sequence number of a dispatch; never moves backwards
    pub fn observe_sequence(&self, sequence: u64) {
        let mut inner = self.inner.lock();
        if inner.sequence.is_none_or(|s| sequence > s) {
            inner.sequence = Some(sequence);
        }
    }

    pub fn sequence(&self) -> Option<u64> {
        self.inner.lock().sequence
    }

    /// Session id and sequence, if the session can be resumed
    pub fn resume_info(&self) -> Option<(String, u64)> {
        let inner = self.inner.lock();
        Some((inner.session_id.clone()?, inner.sequence?))
    }

    /// Where to reconnect for a resume
    pub fn resume_url(&self) -> Option<String> {
        self.inner.lock().resume_url.clone()
    }

    /// Forget the session; the next connection identifies from scratch
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        if inner.session_id.is_some() {
            tracing::info!(session_id = ?inner.session_id, "Gateway session invalidated");
        }
        *inner = Inner::default();
    }
}
