pub mod ingest_service;
pub mod schema;
