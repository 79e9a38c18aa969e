use std::sync::Arc;

use async_trait::async_trait;

use warden_api::ApiClient;
use warden_core::{
    domain::{InboundMessage, Permission},
    embed::Embed,
    ports::ChatGateway,
    registry::Command,
    Result,
};

use super::{target_id, ADMIN};

fn trailing_reason(args: &[String]) -> Option<String> {
    let reason = args.get(1..).unwrap_or_default().join(" ");
    if reason.trim().is_empty() {
        None
    } else {
        Some(reason)
    }
}

pub struct Blacklist {
    api: Arc<ApiClient>,
}

impl Blacklist {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for Blacklist {
    fn name(&self) -> &str {
        "blacklist"
    }
    fn description(&self) -> &str {
        "Blacklist a user."
    }
    fn usage(&self) -> &str {
        "blacklist <uuid/uid/discord> [reason]"
    }
    fn permissions(&self) -> &[Permission] {
        ADMIN
    }

    async fn run(
        &self,
        gateway: &dyn ChatGateway,
        msg: &InboundMessage,
        args: &[String],
    ) -> Result<()> {
        let Some(target) = target_id(msg, args) else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide an identifier."))
                .await;
        };

        let reason = trailing_reason(args);
        let executor = msg.author.id.0.to_string();
        self.api
            .blacklist(&target, reason.as_deref(), &executor)
            .await?;

        gateway
            .send_embed(msg.channel_id, Embed::success("Blacklisted user."))
            .await
    }
}

pub struct Unblacklist {
    api: Arc<ApiClient>,
}

impl Unblacklist {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for Unblacklist {
    fn name(&self) -> &str {
        "unblacklist"
    }
    fn description(&self) -> &str {
        "Remove a user from the blacklist."
    }
    fn usage(&self) -> &str {
        "unblacklist <uuid/uid/discord> [reason]"
    }
    fn permissions(&self) -> &[Permission] {
        ADMIN
    }

    async fn run(
        &self,
        gateway: &dyn ChatGateway,
        msg: &InboundMessage,
        args: &[String],
    ) -> Result<()> {
        let Some(target) = target_id(msg, args) else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide an identifier."))
                .await;
        };

        let reason = trailing_reason(args);
        let executor = msg.author.id.0.to_string();
        self.api
            .unblacklist(&target, reason.as_deref(), &executor)
            .await?;

        gateway
            .send_embed(msg.channel_id, Embed::success("Unblacklisted user."))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_everything_after_the_target() {
        let args: Vec<String> = ["abc", "posting", "malware"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(trailing_reason(&args), Some("posting malware".to_string()));
        assert_eq!(trailing_reason(&args[..1]), None);
        assert_eq!(trailing_reason(&[]), None);
    }
}
