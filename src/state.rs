use std::sync::Arc;

use crate::config::Config;
use crate::storage::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ProfileStore>,
}
