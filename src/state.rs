use crate::service::ObjectStoreService;
use crate::store::ObjectRepository;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ObjectStoreService,
}

impl AppState {
    pub fn new(repository: Arc<dyn ObjectRepository>) -> Self {
        Self {
            service: ObjectStoreService::new(repository),
        }
    }
}
