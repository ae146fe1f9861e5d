use std::sync::Arc;

use stockroom_infra::EntityStore;

/// Handles shared by every request.
///
/// Each request runs its reads and writes straight against the store; there is
/// no transaction spanning a request.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn EntityStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}
