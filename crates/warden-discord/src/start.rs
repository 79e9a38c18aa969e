//! Client bootstrap: build the command table, wire the router, start the
//! gateway connection.

use std::sync::Arc;

use serenity::all::GatewayIntents;
use serenity::Client;

use tracing::info;

use warden_api::ApiClient;
use warden_core::{config::Config, dispatch::Dispatcher, router::EventRouter};

use crate::commands;
use crate::handler::Handler;

pub async fn run(cfg: Arc<Config>, api: Arc<ApiClient>) -> anyhow::Result<()> {
    let registry = commands::build_registry(api, &cfg.prefix)?;
    info!("registered {} commands", registry.len());

    let dispatcher = Dispatcher::new(
        cfg.prefix.clone(),
        cfg.channel_policies.clone(),
        registry,
    );
    let router = EventRouter::new(dispatcher, cfg.home_guild_id);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&cfg.discord_token, intents)
        .event_handler(Handler::new(router))
        .await?;

    client.start().await?;
    Ok(())
}
