use std::sync::Arc;

use sqlx::PgPool;

use crate::database::{Menu, MenuOption, MemoryStore, Repository, Store};

/// Shared, read-only state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub menus: Arc<dyn Store<Menu>>,
    pub menu_options: Arc<dyn Store<MenuOption>>,
    pub jwt_secret: Arc<str>,
    pub max_limit: Option<u32>,
}

impl AppState {
    pub fn new(menus: Arc<dyn Store<Menu>>, menu_options: Arc<dyn Store<MenuOption>>) -> Self {
        Self {
            menus,
            menu_options,
            jwt_secret: Arc::from(""),
            max_limit: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(Repository::<Menu>::new(pool.clone())),
            Arc::new(Repository::<MenuOption>::new(pool)),
        )
    }

    /// Empty in-process collections, used when no database is configured.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::<Menu>::new()),
            Arc::new(MemoryStore::<MenuOption>::new()),
        )
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<Arc<str>>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    pub fn with_max_limit(mut self, max_limit: Option<u32>) -> Self {
        self.max_limit = max_limit;
        self
    }
}
