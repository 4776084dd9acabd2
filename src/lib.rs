pub mod cache;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::cache::QuizCache;
use crate::services::{
    auth_service::AuthService, ingest_service::IngestService, quiz_service::QuizService,
    result_service::ResultService, scoring_service::ScoringService,
};
use crate::store::TableStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
    pub cache: QuizCache,
    pub auth_service: AuthService,
    pub quiz_service: QuizService,
    pub scoring_service: ScoringService,
    pub result_service: ResultService,
    pub ingest_service: IngestService,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        let config = crate::config::get_config();
        let cache = QuizCache::new(store.clone(), Duration::from_secs(config.cache_ttl_secs));

        let auth_service = AuthService::new(store.clone());
        let quiz_service = QuizService::new(cache.clone());
        let scoring_service = ScoringService::new(quiz_service.clone(), store.clone());
        let result_service = ResultService::new(store.clone());
        let ingest_service = IngestService::new(store.clone(), cache.clone());

        Self {
            store,
            cache,
            auth_service,
            quiz_service,
            scoring_service,
            result_service,
            ingest_service,
        }
    }
}
