pub mod client;
pub mod envelope;
pub mod model;
pub mod observer;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::GeminiHttpClient;
pub use model::LanguageModel;
pub use observer::{NoopObserver, ResponseObserver, TracingObserver};
pub use types::GenerateContentRequest;
