use super::client::GeminiHttpClient;
use super::envelope;
use super::types::GenerateContentRequest;
use crate::ai::ContentGenerator;
use crate::models::Config;
use crate::schema::OutputSchema;
use crate::Result;

/// Typed structured-output operation over a [`ContentGenerator`].
///
/// Holds no per-call state; one instance can serve concurrent calls.
pub struct LanguageModel<G = GeminiHttpClient> {
    generator: G,
}

impl LanguageModel<GeminiHttpClient> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(GeminiHttpClient::from_config(config))
    }

    /// Read configuration from the environment. Fails if the API key is
    /// missing, so a model that exists always has a credential.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        tracing::info!("Gemini model: {}", config.model);
        Ok(Self::from_config(&config))
    }
}

impl<G: ContentGenerator> LanguageModel<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Ask the service for a value shaped by `schema` and decode it.
    ///
    /// Either the fully validated value comes back or an error does; a reply
    /// that fails the envelope or schema checks is never retried.
    #[tracing::instrument(
        name = "generate_object",
        skip_all,
        fields(model = self.generator.model(), prompt_len = prompt.len())
    )]
    pub async fn generate_object<T>(&self, prompt: &str, schema: &OutputSchema<T>) -> Result<T> {
        let request = GenerateContentRequest::structured(prompt, schema.descriptor());

        let body = self.generator.generate_content(&request).await?;
        let value = envelope::decode(&body, schema)?;

        tracing::debug!("Decoded structured response ({} bytes)", body.len());
        Ok(value)
    }
}
