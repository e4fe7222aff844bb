pub mod batch;
pub mod error;
pub mod sentiment;
pub mod tabular;
