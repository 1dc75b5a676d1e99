pub mod model_gateway;
pub mod prompt_builder;
pub mod source_fetcher;
pub mod taxonomy_resolver;

pub use model_gateway::{ApiKey, GenerationBackend, ModelGateway};
pub use source_fetcher::SourceFetcher;
pub use taxonomy_resolver::{resolve, Resolution};
