use std::sync::Arc;

use async_trait::async_trait;

use serde_json::Value;

use warden_api::ApiClient;
use warden_core::{
    domain::{InboundMessage, Permission},
    embed::Embed,
    ports::ChatGateway,
    registry::Command,
    Result,
};

use super::{target_id, ADMIN};

pub struct Invite {
    api: Arc<ApiClient>,
}

impl Invite {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for Invite {
    fn name(&self) -> &str {
        "invite"
    }
    fn description(&self) -> &str {
        "Generate an invite code."
    }
    fn usage(&self) -> &str {
        "invite"
    }
    fn permissions(&self) -> &[Permission] {
        ADMIN
    }

    async fn run(
        &self,
        gateway: &dyn ChatGateway,
        msg: &InboundMessage,
        _args: &[String],
    ) -> Result<()> {
        let executor = msg.author.id.0.to_string();
        let payload = self.api.generate_invite(&executor).await?;

        let reply = match payload.get("code").and_then(Value::as_str) {
            Some(code) => format!("Created invite `{code}`."),
            None => "Created invite.".to_string(),
        };
        gateway
            .send_embed(msg.channel_id, Embed::success(reply))
            .await
    }
}

pub struct BulkInvites {
    api: Arc<ApiClient>,
}

impl BulkInvites {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for BulkInvites {
    fn name(&self) -> &str {
        "bulkinvites"
    }
    fn description(&self) -> &str {
        "Generate a batch of invite codes."
    }
    fn usage(&self) -> &str {
        "bulkinvites <count>"
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
        let Some(count) = args.first().and_then(|s| s.parse::<u64>().ok()) else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide a count."))
                .await;
        };

        let executor = msg.author.id.0.to_string();
        self.api.generate_bulk_invites(&executor, count).await?;
        gateway
            .send_embed(
                msg.channel_id,
                Embed::success(format!("Created {count} invites.")),
            )
            .await
    }
}

/// Adjust a user's invite balance.
pub struct GiveInv {
    api: Arc<ApiClient>,
}

impl GiveInv {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for GiveInv {
    fn name(&self) -> &str {
        "giveinv"
    }
    fn description(&self) -> &str {
        "Give a user extra invites."
    }
    fn usage(&self) -> &str {
        "giveinv <uuid/uid/discord> <amount>"
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
        let Some(amount) = args.get(1).and_then(|s| s.parse::<i64>().ok()) else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide an amount."))
                .await;
        };

        self.api.add_invites(&target, amount).await?;
        gateway
            .send_embed(
                msg.channel_id,
                Embed::success(format!("Adjusted invite balance by {amount}.")),
            )
            .await
    }
}

/// Hand an invite to every eligible user at once.
pub struct InvWave {
    api: Arc<ApiClient>,
}

impl InvWave {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for InvWave {
    fn name(&self) -> &str {
        "invwave"
    }
    fn description(&self) -> &str {
        "Trigger an invite wave."
    }
    fn usage(&self) -> &str {
        "invwave <amount>"
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
        let Some(amount) = args.first().and_then(|s| s.parse::<u64>().ok()) else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide an amount."))
                .await;
        };

        self.api.invite_wave(amount).await?;
        gateway
            .send_embed(
                msg.channel_id,
                Embed::success(format!("Sent an invite wave of {amount}.")),
            )
            .await
    }
}

pub struct DeleteInvite {
    api: Arc<ApiClient>,
}

impl DeleteInvite {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for DeleteInvite {
    fn name(&self) -> &str {
        "deleteinvite"
    }
    fn description(&self) -> &str {
        "Delete an invite code."
    }
    fn usage(&self) -> &str {
        "deleteinvite <invite>"
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
        let Some(invite) = args.first() else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide an invite."))
                .await;
        };

        self.api.delete_invite(invite).await?;
        gateway
            .send_embed(msg.channel_id, Embed::success("Deleted invite."))
            .await
    }
}
