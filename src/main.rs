use log::info;
use message_composer::{start_server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init_timed();

    let config = Config::from_env()?;
    info!("Upstream: {}", config.upstream_url);

    start_server(config).await
}
