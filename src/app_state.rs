use std::sync::Arc;
use tracing::info;

use crate::{
    config::Config,
    error::AppResult,
    infrastructure::{DocumentStore, IdGenerator, MemoryDocumentStore, SqliteDocumentStore},
    services::{
        BookmarkService, FollowService, LikeService, MessageService, TuitService, UserService,
    },
};

/// Shared handler state: one service per store, all over the same document store.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub bookmarks: BookmarkService,
    pub tuits: TuitService,
    pub likes: LikeService,
    pub follows: FollowService,
    pub messages: MessageService,
}

impl AppState {
    pub async fn new(config: &Config) -> AppResult<Self> {
        let ids = Arc::new(IdGenerator::new(config.ids.worker_id)?);

        let store: Arc<dyn DocumentStore> = if config.uses_memory_store() {
            info!("Using in-memory document store");
            Arc::new(MemoryDocumentStore::new(ids))
        } else if config.database.url == "sqlite::memory:" {
            info!("Using private in-memory SQLite database");
            Arc::new(SqliteDocumentStore::new_in_memory(ids).await?)
        } else {
            info!("Connecting to {}", config.database.url);
            Arc::new(SqliteDocumentStore::connect(&config.database.url, ids).await?)
        };

        Ok(Self::with_store(store))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: UserService::new(store.clone()),
            bookmarks: BookmarkService::new(store.clone()),
            tuits: TuitService::new(store.clone()),
            likes: LikeService::new(store.clone()),
            follows: FollowService::new(store.clone()),
            messages: MessageService::new(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::UserProfile;

    fn memory_config(worker_id: u16) -> Config {
        let mut config = Config::default();
        config.database.url = crate::config::MEMORY_DATABASE_URL.to_string();
        config.ids.worker_id = worker_id;
        config
    }

    #[tokio::test]
    async fn services_share_one_store() {
        let state = AppState::new(&memory_config(3)).await.unwrap();
        let user = state
            .users
            .create_user(UserProfile::new("alice", "pw"))
            .await
            .unwrap();
        assert_eq!(user.id.worker_id(), 3);

        state.follows.follow(user.id, user.id).await.unwrap();
        let fans = state.follows.view_followers(user.id).await.unwrap();
        assert_eq!(fans[0].follower.populated().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn rejects_out_of_range_worker() {
        let result = AppState::new(&memory_config(1024)).await;
        assert!(matches!(result, Err(AppError::IdGenerationError(_))));
    }
}
