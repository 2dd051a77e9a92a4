pub mod cache;
pub mod config;
pub mod errors;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod providers;
pub mod query;
pub mod reference;
pub mod report;
pub mod storage;
