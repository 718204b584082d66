use std::sync::Arc;

use affiliate_shared::store::ContentStore;

use crate::config::ApiKey;

#[derive(Clone)]
pub struct AppState {
    /// Post/product storage, SQLite or MySQL
    store: Arc<dyn ContentStore>,
    /// Webhook secret, fixed for the process lifetime
    api_key: Arc<ApiKey>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, api_key: ApiKey) -> Self {
        Self {
            store,
            api_key: Arc::new(api_key),
        }
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}
