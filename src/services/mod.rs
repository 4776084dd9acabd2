pub mod auth_service;
pub mod ingest_service;
pub mod quiz_service;
pub mod result_service;
pub mod scoring_service;
