pub mod health;
pub mod webhooks;

use std::sync::Arc;
use temboplus::{Environment, TemboPlusClient};

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<TemboPlusClient>,
    pub environment: Environment,
}
