//! Serenity event handler: converts gateway payloads into domain types and
//! hands them to the core event router.

use serenity::all::{ChannelType, Context, EventHandler, Guild, Message, Permissions, Ready};
use serenity::async_trait;

use tracing::info;

use warden_core::{
    domain::{self, Author, GuildJoin, InboundMessage, Permission, PermissionSet},
    router::EventRouter,
};

use crate::gateway::DiscordGateway;

pub struct Handler {
    router: EventRouter,
}

impl Handler {
    pub fn new(router: EventRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("connected as {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = convert_message(&ctx, &msg);
        let gateway = DiscordGateway::new(ctx.http.clone());
        self.router.message(&gateway, inbound).await;
    }

    /// `guild_create` also fires for every guild on startup; only actual
    /// joins go through the allow-list.
    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        if is_new != Some(true) {
            return;
        }

        let join = GuildJoin {
            guild_id: domain::GuildId(guild.id.get()),
            first_channel: first_text_channel(&guild),
        };
        let gateway = DiscordGateway::new(ctx.http.clone());
        self.router.guild_joined(&gateway, join).await;
    }
}

fn convert_message(ctx: &Context, msg: &Message) -> InboundMessage {
    InboundMessage {
        id: domain::MessageId(msg.id.get()),
        channel_id: domain::ChannelId(msg.channel_id.get()),
        guild_id: msg.guild_id.map(|g| domain::GuildId(g.get())),
        author: Author {
            id: domain::UserId(msg.author.id.get()),
            is_bot: msg.author.bot,
        },
        content: msg.content.clone(),
        mentions: msg
            .mentions
            .iter()
            .map(|u| domain::UserId(u.id.get()))
            .collect(),
        member_permissions: resolve_member_permissions(ctx, msg),
    }
}

/// Guild-level permissions of the message author. Prefers the permissions
/// shipped on the member payload, falls back to computing them from the
/// cached guild. `None` for direct messages or when nothing is resolvable.
fn resolve_member_permissions(ctx: &Context, msg: &Message) -> Option<PermissionSet> {
    msg.guild_id?;

    if let Some(member) = msg.member.as_deref() {
        if let Some(perms) = member.permissions {
            return Some(map_permissions(perms));
        }
    }

    let guild = msg.guild(&ctx.cache)?;
    let member = guild.members.get(&msg.author.id)?;
    Some(map_permissions(guild.member_permissions(member)))
}

fn map_permissions(perms: Permissions) -> PermissionSet {
    let all = perms.contains(Permissions::ADMINISTRATOR);
    [
        (Permissions::SEND_MESSAGES, Permission::SendMessages),
        (Permissions::MANAGE_MESSAGES, Permission::ManageMessages),
        (Permissions::BAN_MEMBERS, Permission::BanMembers),
        (Permissions::ADMINISTRATOR, Permission::Administrator),
    ]
    .into_iter()
    .filter(|(bit, _)| all || perms.contains(*bit))
    .map(|(_, permission)| permission)
    .collect()
}

fn first_text_channel(guild: &Guild) -> Option<domain::ChannelId> {
    guild
        .channels
        .values()
        .filter(|c| c.kind == ChannelType::Text)
        .min_by_key(|c| (c.position, c.id.get()))
        .map(|c| domain::ChannelId(c.id.get()))
}
