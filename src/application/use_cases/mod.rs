pub mod batch_orchestrator;
pub mod batch_sentiment;
pub mod column_resolver;
pub mod result_normalizer;
pub mod sentiment_model;
pub mod single_sentiment;

#[cfg(test)]
pub(crate) mod test_support;
