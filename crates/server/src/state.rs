use std::sync::Arc;

use playshelf_core::{
    CollectionStore, Config, GameService, GameSource, SanitizedConfig, UserStore,
};

use crate::sessions::SessionStore;

/// Shared application state
pub struct AppState {
    config: Config,
    games: GameService,
    remote: Arc<dyn GameSource>,
    users: Arc<dyn UserStore>,
    collections: Arc<dyn CollectionStore>,
    sessions: SessionStore,
}

impl AppState {
    pub fn new(
        config: Config,
        games: GameService,
        remote: Arc<dyn GameSource>,
        users: Arc<dyn UserStore>,
        collections: Arc<dyn CollectionStore>,
    ) -> Self {
        Self {
            config,
            games,
            remote,
            users,
            collections,
            sessions: SessionStore::default(),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn games(&self) -> &GameService {
        &self.games
    }

    pub fn remote(&self) -> &dyn GameSource {
        self.remote.as_ref()
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn collections(&self) -> &dyn CollectionStore {
        self.collections.as_ref()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
