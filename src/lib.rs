//! Typed structured-output client for Gemini's `generateContent` API.
//!
//! A prompt and an [`OutputSchema`] go in; a value of the schema's Rust type
//! comes out, or a typed [`Error`] saying which layer failed.
//!
//! ```rust,no_run
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use typed_gemini::{LanguageModel, OutputSchema};
//!
//! #[derive(Debug, Deserialize, JsonSchema)]
//! struct Person {
//!     name: String,
//!     age: f64,
//! }
//!
//! # async fn run() -> typed_gemini::Result<()> {
//! let model = LanguageModel::from_env()?;
//! let person: Person = model
//!     .generate_object("Who wrote the first computer program?", &OutputSchema::derive())
//!     .await?;
//! println!("{:?}", person);
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod error;
pub mod models;
pub mod retry;
pub mod schema;

pub use ai::{ContentGenerator, GeminiHttpClient, LanguageModel, MockContentGenerator};
pub use error::{EnvelopeError, Error, Result, TransportError, ValidationError};
pub use models::{ApiKey, Config};
pub use retry::RetryPolicy;
pub use schema::OutputSchema;
