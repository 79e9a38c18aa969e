use std::sync::Arc;

use async_trait::async_trait;

use chrono::{DateTime, Utc};
use serde_json::Value;

use warden_api::ApiClient;
use warden_core::{
    domain::{InboundMessage, Permission},
    embed::{Embed, COLOR_INFO},
    ports::ChatGateway,
    registry::Command,
    Result,
};

use super::{target_id, ADMIN, EVERYONE};

/// Render the user record the backend returns for `GET /admin/users/{id}`.
pub struct Lookup {
    api: Arc<ApiClient>,
}

impl Lookup {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for Lookup {
    fn name(&self) -> &str {
        "lookup"
    }
    fn description(&self) -> &str {
        "Look up a user account."
    }
    fn usage(&self) -> &str {
        "lookup <uuid/uid/discord>"
    }
    fn permissions(&self) -> &[Permission] {
        EVERYONE
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

        let payload = self.api.get_user(&target).await?;
        let user = &payload["user"];

        let uid = text(&user["uid"]);
        let statistics = format!(
            "Uploaded {} images\nLast login {}, registered {}",
            text(&user["uploads"]),
            fmt_timestamp(&user["lastLogin"]),
            fmt_timestamp(&user["registrationDate"]),
        );
        let discord = match user["discordId"].as_str() {
            Some(id) => format!("<@{id}>"),
            None => "Not Linked".to_string(),
        };
        let invited = match user["invitedUsers"].as_array() {
            Some(list) if !list.is_empty() => {
                let names: Vec<String> = list.iter().map(text).collect();
                format!("```{}```", names.join(", "))
            }
            _ => "None".to_string(),
        };

        let mut embed = Embed::new()
            .description(format!(
                "UID {uid} | {} ({})",
                text(&user["username"]),
                text(&user["role"]),
            ))
            .color(COLOR_INFO)
            .field("Statistics", statistics, true)
            .field("Discord", discord, true)
            .field("Invites", invited, false)
            .footer(format!(
                "UUID {} | Invited by {}",
                text(&user["uuid"]),
                text(&user["invitedBy"]),
            ));
        if let Some(avatar) = user["avatar"].as_str() {
            embed = embed.thumbnail(avatar);
        }

        gateway.send_embed(msg.channel_id, embed).await
    }
}

pub struct VerifyEmail {
    api: Arc<ApiClient>,
}

impl VerifyEmail {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for VerifyEmail {
    fn name(&self) -> &str {
        "verifyemail"
    }
    fn description(&self) -> &str {
        "Verify a user's email."
    }
    fn usage(&self) -> &str {
        "verifyemail <uuid/username/email/invite/key/discord>"
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

        self.api.verify_email(&target).await?;
        gateway
            .send_embed(msg.channel_id, Embed::success("Verified user email."))
            .await
    }
}

pub struct Premium {
    api: Arc<ApiClient>,
}

impl Premium {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for Premium {
    fn name(&self) -> &str {
        "premium"
    }
    fn description(&self) -> &str {
        "Grant a user premium."
    }
    fn usage(&self) -> &str {
        "premium <uuid/uid/discord>"
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

        self.api.premium(&target).await?;
        gateway
            .send_embed(msg.channel_id, Embed::success("Granted premium."))
            .await
    }
}

/// Deletes every file and resets the account. The backend is the one place
/// that can refuse; there is no confirmation step here.
pub struct Wipe {
    api: Arc<ApiClient>,
}

impl Wipe {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for Wipe {
    fn name(&self) -> &str {
        "wipe"
    }
    fn description(&self) -> &str {
        "Wipe a user's account."
    }
    fn usage(&self) -> &str {
        "wipe <uuid/uid/discord>"
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

        self.api.wipe_user(&target).await?;
        gateway
            .send_embed(msg.channel_id, Embed::success("Wiped user."))
            .await
    }
}

pub struct SetUid {
    api: Arc<ApiClient>,
}

impl SetUid {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for SetUid {
    fn name(&self) -> &str {
        "setuid"
    }
    fn description(&self) -> &str {
        "Set a user's numeric UID."
    }
    fn usage(&self) -> &str {
        "setuid <uuid/discord> <uid>"
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
        let Some(new_uid) = args.get(1).and_then(|s| s.parse::<u64>().ok()) else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide a numeric UID."))
                .await;
        };

        self.api.set_uid(&target, new_uid).await?;
        gateway
            .send_embed(msg.channel_id, Embed::success(format!("Set UID to {new_uid}.")))
            .await
    }
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "unknown".to_string(),
        other => other.to_string(),
    }
}

fn fmt_timestamp(v: &Value) -> String {
    let Some(raw) = v.as_str() else {
        return "unknown".to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}
