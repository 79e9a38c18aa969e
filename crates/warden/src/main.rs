use std::sync::Arc;

use warden_api::ApiClient;
use warden_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), warden_core::Error> {
    warden_core::logging::init("warden")?;

    let cfg = Arc::new(Config::load()?);
    let api = Arc::new(ApiClient::new(
        cfg.backend_url.clone(),
        cfg.api_key.clone(),
        cfg.http_timeout,
    )?);

    warden_discord::start::run(cfg, api)
        .await
        .map_err(|e| warden_core::Error::Gateway(format!("discord client failed: {e}")))?;

    Ok(())
}
