//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::BlogService;
use quill_infra::{DatabaseConfig, InMemoryBlogRepository};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresCommentRepository, PostgresPostRepository, database};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    /// Storage backend name, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, falling back to memory without a database.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match database::connect(config).await {
                Ok(conn) => Self {
                    blog: BlogService::new(
                        Arc::new(PostgresPostRepository::new(conn.clone())),
                        Arc::new(PostgresCommentRepository::new(conn)),
                    ),
                    storage: "postgres",
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            Self::in_memory()
        };

        tracing::info!("Application state initialized");
        state
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        let repo = Arc::new(InMemoryBlogRepository::new());
        Self {
            blog: BlogService::new(repo.clone(), repo),
            storage: "memory",
        }
    }
}
