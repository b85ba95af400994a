use std::sync::Arc;

use crate::config::Config;
use crate::db::SharedDb;
use crate::scanner::Scanner;
use crate::tasks::TaskRegistry;

/// Shared application state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub db: SharedDb,
    pub config: Arc<Config>,
    pub scanner: Arc<Scanner>,
    /// Background scans started through `add_async`.
    pub tasks: TaskRegistry,
}

impl AppState {
    pub fn new(db: SharedDb, config: Config) -> Self {
        Self {
            db,
            scanner: Arc::new(Scanner::new(&config.scanner)),
            tasks: TaskRegistry::new(config.scanner.max_concurrent_scans),
            config: Arc::new(config),
        }
    }
}
