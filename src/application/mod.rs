pub mod use_cases;

pub use use_cases::batch_orchestrator::BatchOrchestrator;
pub use use_cases::batch_sentiment::BatchSentimentUseCase;
pub use use_cases::column_resolver::ColumnResolver;
pub use use_cases::sentiment_model::SentimentModel;
pub use use_cases::single_sentiment::SingleSentimentUseCase;
