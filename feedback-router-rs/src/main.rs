// feedback-router-rs/src/main.rs
// Serves the airline feedback form

use std::sync::Arc;

use dotenv::dotenv;
use generation_sdk::config::EnvConfigProvider;
use generation_sdk::openai::OpenAIClient;

use feedback_router::config::ENV_PREFIX;
use feedback_router::{web, AppConfig, FeedbackRouter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let provider = EnvConfigProvider::new().with_prefix(ENV_PREFIX);
    let config = match AppConfig::from_provider(&provider) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Refusing to start: {}", err);
            return Err(err.into());
        }
    };

    let client = OpenAIClient::builder().config(config.openai.clone()).build()?;
    log::info!(
        "Generation client: model={}, base_url={}, timeout={}s, retries={}",
        config.openai.model,
        config.openai.base_url,
        config.openai.timeout_seconds,
        config.openai.max_retries
    );

    let router = Arc::new(FeedbackRouter::from_config(&config, client));
    let app = web::app(router);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!(
        "Feedback router listening on {} (sentiment={}, fault={}, render={})",
        config.bind_addr,
        config.sentiment_mode,
        config.fault_mode,
        config.render_mode
    );

    axum::serve(listener, app).await?;

    Ok(())
}
