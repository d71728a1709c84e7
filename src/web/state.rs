use crate::cache::QueryCache;
use crate::config::AppConfig;
use crate::db::executor::QueryExecutor;
use crate::llm::LlmManager;
use minijinja::Environment;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state for the web server
pub struct AppState {
    pub config: AppConfig,
    pub executor: QueryExecutor,
    pub llm_manager: Arc<LlmManager>,
    pub cache: QueryCache,
    pub template_env: Environment<'static>,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, llm_manager: LlmManager) -> Self {
        let executor =
            QueryExecutor::new(config.database.path.as_str(), config.database.read_only);
        let cache = QueryCache::new(
            config.cache.enabled,
            Duration::from_secs(config.cache.ttl_secs),
        );

        Self {
            executor,
            cache,
            llm_manager: Arc::new(llm_manager),
            template_env: super::templates::init_templates(),
            startup_time: chrono::Utc::now(),
            config,
        }
    }
}
