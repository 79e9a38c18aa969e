//! Command bodies.
//!
//! Every command is a thin pass-through: validate arguments, call one
//! backend operation, reply with a success or error embed. Anything the
//! backend refuses surfaces through the dispatcher as a single error reply.

use std::sync::Arc;

use warden_api::ApiClient;
use warden_core::{
    domain::{InboundMessage, Permission},
    registry::{Command, CommandRegistry},
    Result,
};

mod domains;
mod files;
mod help;
mod invites;
mod moderation;
mod stats;
mod users;

pub use help::Help;

/// Baseline requirement for every command.
pub(crate) const EVERYONE: &[Permission] = &[Permission::SendMessages];
/// Commands that mutate backend state.
pub(crate) const ADMIN: &[Permission] = &[Permission::SendMessages, Permission::Administrator];

/// Build the full command table. Fails on duplicate names.
pub fn build_registry(api: Arc<ApiClient>, prefix: &str) -> Result<CommandRegistry> {
    let commands: Vec<Arc<dyn Command>> = vec![
        Arc::new(users::Lookup::new(api.clone())),
        Arc::new(users::VerifyEmail::new(api.clone())),
        Arc::new(users::Premium::new(api.clone())),
        Arc::new(users::Wipe::new(api.clone())),
        Arc::new(users::SetUid::new(api.clone())),
        Arc::new(moderation::Blacklist::new(api.clone())),
        Arc::new(moderation::Unblacklist::new(api.clone())),
        Arc::new(invites::Invite::new(api.clone())),
        Arc::new(invites::BulkInvites::new(api.clone())),
        Arc::new(invites::GiveInv::new(api.clone())),
        Arc::new(invites::InvWave::new(api.clone())),
        Arc::new(invites::DeleteInvite::new(api.clone())),
        Arc::new(domains::AddDomain::new(api.clone())),
        Arc::new(domains::AddDomains::new(api.clone())),
        Arc::new(domains::DeleteDomain::new(api.clone())),
        Arc::new(files::DeleteImage::new(api.clone())),
        Arc::new(stats::Stats::new(api)),
    ];

    let help = Help::new(prefix, &commands);

    let mut registry = CommandRegistry::default();
    for command in commands {
        registry.register(command)?;
    }
    registry.register(Arc::new(help))?;

    Ok(registry)
}

/// Target of a user-directed command: a mention wins over the first
/// positional argument.
pub(crate) fn target_id(msg: &InboundMessage, args: &[String]) -> Option<String> {
    if let Some(user) = msg.mentions.first() {
        return Some(user.0.to_string());
    }
    args.first().cloned()
}

/// Lenient boolean for optional command flags.
pub(crate) fn parse_flag(arg: Option<&String>) -> bool {
    matches!(
        arg.map(|s| s.to_lowercase()).as_deref(),
        Some("true" | "yes" | "1" | "on")
    )
}
