use std::sync::Arc;

use async_trait::async_trait;

use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::http::Http;
use serenity::model::colour::Colour;

use warden_core::{
    domain::{ChannelId, GuildId, MessageId},
    embed::Embed,
    errors::Error,
    ports::ChatGateway,
    Result,
};

/// ChatGateway over the Discord HTTP API.
///
/// Cheap to construct per event; it only clones the shared `Http` handle.
pub struct DiscordGateway {
    http: Arc<Http>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn map_err(e: serenity::Error) -> Error {
        Error::Gateway(format!("discord error: {e}"))
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<()> {
        serenity::model::id::ChannelId::new(channel.0)
            .say(&self.http, text)
            .await
            .map(drop)
            .map_err(Self::map_err)
    }

    async fn send_embed(&self, channel: ChannelId, embed: Embed) -> Result<()> {
        let message = CreateMessage::new().embed(to_create_embed(embed));
        serenity::model::id::ChannelId::new(channel.0)
            .send_message(&self.http, message)
            .await
            .map(drop)
            .map_err(Self::map_err)
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        self.http
            .delete_message(
                serenity::model::id::ChannelId::new(channel.0),
                serenity::model::id::MessageId::new(message.0),
                None,
            )
            .await
            .map_err(Self::map_err)
    }

    async fn leave_guild(&self, guild: GuildId) -> Result<()> {
        self.http
            .leave_guild(serenity::model::id::GuildId::new(guild.0))
            .await
            .map_err(Self::map_err)
    }
}

fn to_create_embed(embed: Embed) -> CreateEmbed {
    let mut out = CreateEmbed::new();
    if let Some(title) = embed.title {
        out = out.title(title);
    }
    if let Some(description) = embed.description {
        out = out.description(description);
    }
    if let Some(color) = embed.color {
        out = out.colour(Colour::new(color));
    }
    for field in embed.fields {
        out = out.field(field.name, field.value, field.inline);
    }
    if let Some(footer) = embed.footer {
        out = out.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(url) = embed.thumbnail {
        out = out.thumbnail(url);
    }
    out
}
