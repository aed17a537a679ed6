use bytes::Bytes;
use pdf_refit_core::{AppConfig, PdfRefitter, util};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A finished refit run kept around until the user downloads it.
pub struct Session {
    /// Serialized composite PDF
    pub result: Bytes,
    /// File name offered in the download dialog
    pub download_name: String,
    /// Original content file name, shown on the result page
    pub content_filename: String,
    /// Original style file name, shown on the result page
    pub style_filename: String,
    /// Page count of the composite document
    pub page_count: usize,
    pub created_at: std::time::Instant,
}

/// Global application state
pub struct AppState {
    /// Finished runs indexed by UUID
    sessions: RwLock<HashMap<Uuid, Session>>,
    /// Shared pipeline - enforces one run in flight across all requests
    pub refitter: PdfRefitter,
    pub config: AppConfig,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            refitter: PdfRefitter::new(config.clone()),
            config,
        }
    }

    /// Store a finished run and return its session ID (for URL embedding).
    pub async fn create_session(
        &self,
        result: Bytes,
        content_filename: String,
        style_filename: String,
        page_count: usize,
    ) -> String {
        let id = Uuid::new_v4();

        let session = Session {
            result,
            download_name: util::output_filename(&self.config.output_prefix),
            content_filename,
            style_filename,
            page_count,
            created_at: std::time::Instant::now(),
        };

        self.sessions.write().await.insert(id, session);
        id.to_string()
    }

    /// Get a session by ID string.
    ///
    /// Returns `None` if the ID is not a valid UUID or session doesn't exist.
    pub async fn get_session(&self, id: &str) -> Option<SessionRef<'_>> {
        let uuid = Uuid::parse_str(id).ok()?;
        let sessions = self.sessions.read().await;
        if sessions.contains_key(&uuid) {
            Some(SessionRef {
                id: uuid,
                state: self,
            })
        } else {
            None
        }
    }

    /// Cleanup old sessions (older than 1 hour)
    pub async fn cleanup_old_sessions(&self) {
        let mut sessions = self.sessions.write().await;
        let now = std::time::Instant::now();
        let max_age = std::time::Duration::from_secs(3600);

        sessions.retain(|_, session| now.duration_since(session.created_at) < max_age);
    }
}

/// A borrowed reference to a session that provides safe access patterns.
///
/// Holding a lock guard across an `.await` point deadlocks easily and the
/// guard isn't `Send`; instead only the session ID is kept and the lock is
/// taken inside a synchronous closure, released before this returns.
pub struct SessionRef<'a> {
    id: Uuid,
    state: &'a AppState,
}

impl SessionRef<'_> {
    /// Access session data immutably within a closure.
    pub async fn with_session<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&Session) -> R,
    {
        let sessions = self.state.sessions.read().await;
        sessions.get(&self.id).map(f)
    }
}
