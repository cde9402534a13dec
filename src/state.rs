use crate::config::AppConfig;
use crate::services::sessions::SessionRegistry;

pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionRegistry,
}
