//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    CommentRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use inkwell_infra::auth::{Argon2PasswordService, JwtTokenService};
use inkwell_infra::database::memory::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository,
};
use inkwell_infra::database::{
    DatabaseConnection, PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub login_path: String,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        if let Some(db_config) = &config.database {
            match DatabaseConnection::init(db_config).await {
                Ok(connection) => {
                    let db = connection.conn;
                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        posts: Arc::new(PostgresPostRepository::new(db.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                        users: Arc::new(PostgresUserRepository::new(db)),
                        tokens: Arc::new(JwtTokenService::from_env()),
                        passwords: Arc::new(Argon2PasswordService::new()),
                        login_path: config.login_path.clone(),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        Self::in_memory(&config.login_path)
    }

    /// In-memory state - the no-database fallback, also used by tests.
    pub fn in_memory(login_path: &str) -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            tokens: Arc::new(JwtTokenService::from_env()),
            passwords: Arc::new(Argon2PasswordService::new()),
            login_path: login_path.to_string(),
        }
    }
}
