//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::email::EmailService;
use crate::services::storage::FileStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to the pool, the
/// mailer, the file store, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    mailer: EmailService,
    files: FileStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay configuration is invalid.
    pub fn new(
        config: ApiConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let mailer = EmailService::new(&config.email)?;
        let files = FileStore::new(&config.upload_dir);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                files,
            }),
        })
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Transactional mailer.
    #[must_use]
    pub fn mailer(&self) -> &EmailService {
        &self.inner.mailer
    }

    /// Upload file store.
    #[must_use]
    pub fn files(&self) -> &FileStore {
        &self.inner.files
    }
}
