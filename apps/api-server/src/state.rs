//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, KeyHasher, PostRepository, RateLimiter};
use quill_infra::database::InMemoryStore;

use crate::config::AppConfig;
use crate::middleware::rate_limit::ClientKey;

/// Which backend the repositories talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Stored admin key hash and the hasher able to verify it.
#[derive(Clone)]
pub struct AdminKey {
    pub hash: String,
    pub hasher: Arc<dyn KeyHasher>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub storage: Storage,
    /// `None` disables the admin routes.
    pub admin: Option<AdminKey>,
    /// Applied to the public write endpoints. `None` disables limiting.
    pub write_limiter: Option<Arc<dyn RateLimiter>>,
    pub client_key: ClientKey,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let mut state = Self::connect_storage(config).await;

        #[cfg(feature = "auth")]
        if let Some(hash) = config.admin_key_hash.clone() {
            let hasher = quill_infra::Argon2KeyHasher::new();
            match hasher.check_stored(&hash) {
                Ok(()) => {
                    state = state.with_admin_key(AdminKey {
                        hash,
                        hasher: Arc::new(hasher),
                    });
                }
                Err(e) => tracing::error!("Ignoring admin key: {}", e),
            }
        }
        if state.admin.is_none() {
            tracing::warn!("No usable ADMIN_KEY_HASH. Admin routes are disabled.");
        }

        #[cfg(feature = "rate-limit")]
        {
            use quill_infra::{InMemoryRateLimiter, RateLimitConfig};

            state = state.with_write_limiter(Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
                max_requests: config.rate_limit.max_requests,
                window: config.rate_limit.window,
            })));
            if config.rate_limit.trust_forwarded {
                state = state.with_client_key(ClientKey::Forwarded);
            }
            tracing::info!(
                max_requests = config.rate_limit.max_requests,
                window_secs = config.rate_limit.window.as_secs(),
                client_key = ?state.client_key,
                "Write rate limiting enabled"
            );
        }

        tracing::info!(storage = state.storage.as_str(), "Application state initialized");
        state
    }

    /// State over a fresh in-memory store, without admin access or rate limiting.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            storage: Storage::Memory,
            admin: None,
            write_limiter: None,
            client_key: ClientKey::default(),
        }
    }

    pub fn with_admin_key(mut self, admin: AdminKey) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn with_write_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.write_limiter = Some(limiter);
        self
    }

    pub fn with_client_key(mut self, client_key: ClientKey) -> Self {
        self.client_key = client_key;
        self
    }

    #[cfg(feature = "postgres")]
    async fn connect_storage(config: &AppConfig) -> Self {
        use quill_infra::database::{PostgresCommentRepository, PostgresPostRepository, connect};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match connect(db_config).await {
            Ok(conn) => {
                let conn = Arc::new(conn);
                Self {
                    posts: Arc::new(PostgresPostRepository::new(Arc::clone(&conn))),
                    comments: Arc::new(PostgresCommentRepository::new(conn)),
                    storage: Storage::Postgres,
                    admin: None,
                    write_limiter: None,
                    client_key: ClientKey::default(),
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_storage(config: &AppConfig) -> Self {
        if config.database.is_some() {
            tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        }
        tracing::info!("Using in-memory repository");
        Self::in_memory()
    }
}
