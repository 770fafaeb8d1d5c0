use anyhow::Result;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typed_gemini::{LanguageModel, OutputSchema};

#[derive(Debug, Deserialize, JsonSchema)]
struct Person {
    name: String,
    age: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "generate_person=info,typed_gemini=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let model = match LanguageModel::from_env() {
        Ok(model) => model,
        Err(e) => {
            error!("Failed to initialize client: {}", e);
            std::process::exit(1);
        }
    };

    let prompt = std::env::args().nth(1).unwrap_or_else(|| {
        "Name the author of the first published computer program and their age at death."
            .to_string()
    });

    let person: Person = model.generate_object(&prompt, &OutputSchema::derive()).await?;

    info!("{} ({})", person.name, person.age);
    Ok(())
}
