use async_trait::async_trait;

use crate::{
    domain::{ChannelId, GuildId, MessageId},
    embed::Embed,
    Result,
};

/// Port over the chat platform.
///
/// Discord is the first implementation; the shape is small enough that a
/// future adapter only needs plain sends, deletes and a guild leave. Member
/// permission lookup is resolved by the adapter onto `InboundMessage` before
/// dispatch, so it does not appear here.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<()>;
    async fn send_embed(&self, channel: ChannelId, embed: Embed) -> Result<()>;
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()>;
    async fn leave_guild(&self, guild: GuildId) -> Result<()>;
}
