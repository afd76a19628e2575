//! Server state and configuration.

use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::form::FormState;
use crate::render::QrStyle;

/// Idle sessions are dropped after this many seconds (30 minutes).
pub const SESSION_EXPIRATION_SECS: u64 = 30 * 60;

/// Upload limit for logo files. Deliberately above the form's own limit so
/// oversized logos reach the form and get its "too large" message.
pub const LOGO_UPLOAD_LIMIT: usize = 8 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// How long an untouched session is kept
    pub session_expiration: Duration,
    /// Style applied to every preview and download
    pub style: QrStyle,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            session_expiration: Duration::from_secs(SESSION_EXPIRATION_SECS),
            style: QrStyle::default(),
        }
    }
}

/// One browser's form.
pub struct Session {
    pub form: FormState,
    pub last_accessed: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            form: FormState::new(),
            last_accessed: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
    pub sessions: RwLock<HashMap<Uuid, Session>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            config,
            boot_time,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Drop sessions idle for longer than the configured expiration.
    /// Returns how many were removed.
    pub async fn expire_sessions(&self, now: Instant) -> usize {
        let expiration = self.config.session_expiration;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_accessed) < expiration);
        before - sessions.len()
    }
}
