use std::collections::HashSet;

/// Discord user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// Discord channel id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

/// Discord guild (server) id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GuildId(pub u64);

/// Discord message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// Capability token a command may require from the invoking member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    SendMessages,
    ManageMessages,
    BanMembers,
    Administrator,
}

/// The set of capabilities a guild member holds, resolved by the gateway
/// adapter before dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn contains_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.contains(*p))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Author {
    pub id: UserId,
    pub is_bot: bool,
}

/// Platform-agnostic inbound chat message.
///
/// `member_permissions` is `None` outside guild channels; the dispatcher
/// treats that as "no gate applies" for direct messages.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author: Author,
    pub content: String,
    pub mentions: Vec<UserId>,
    pub member_permissions: Option<PermissionSet>,
}

/// A "joined new guild" event as seen by the router.
#[derive(Clone, Copy, Debug)]
pub struct GuildJoin {
    pub guild_id: GuildId,
    /// First available text channel, if the adapter could determine one.
    pub first_channel: Option<ChannelId>,
}
