pub mod config;
pub mod sentiment_backend;
pub mod storage;
pub mod tabular;
