use std::sync::Arc;

use async_trait::async_trait;

use warden_api::{ApiClient, NewDomain};
use warden_core::{
    domain::{InboundMessage, Permission},
    embed::Embed,
    ports::ChatGateway,
    registry::Command,
    Result,
};

use super::{parse_flag, ADMIN};

pub struct AddDomain {
    api: Arc<ApiClient>,
}

impl AddDomain {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for AddDomain {
    fn name(&self) -> &str {
        "adddomain"
    }
    fn description(&self) -> &str {
        "Register a new upload domain."
    }
    fn usage(&self) -> &str {
        "adddomain <name> [wildcard] [donated] [donatedBy] [userOnly]"
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
        let Some(name) = args.first() else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide a domain name."))
                .await;
        };

        let domain = NewDomain {
            name: name.clone(),
            wildcard: parse_flag(args.get(1)),
            donated: parse_flag(args.get(2)),
            donated_by: args.get(3).cloned().unwrap_or_else(|| "null".to_string()),
            user_only: parse_flag(args.get(4)),
        };

        self.api.add_domain(domain).await?;
        gateway
            .send_embed(
                msg.channel_id,
                Embed::success(format!("Added domain {name}.")),
            )
            .await
    }
}

pub struct AddDomains {
    api: Arc<ApiClient>,
}

impl AddDomains {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for AddDomains {
    fn name(&self) -> &str {
        "adddomains"
    }
    fn description(&self) -> &str {
        "Register several plain upload domains at once."
    }
    fn usage(&self) -> &str {
        "adddomains <name>..."
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
        if args.is_empty() {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide at least one domain."))
                .await;
        }

        let domains: Vec<NewDomain> = args.iter().map(NewDomain::named).collect();
        let count = domains.len();
        self.api.add_domains(domains).await?;

        gateway
            .send_embed(
                msg.channel_id,
                Embed::success(format!("Added {count} domains.")),
            )
            .await
    }
}

pub struct DeleteDomain {
    api: Arc<ApiClient>,
}

impl DeleteDomain {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for DeleteDomain {
    fn name(&self) -> &str {
        "deletedomain"
    }
    fn description(&self) -> &str {
        "Remove an upload domain."
    }
    fn usage(&self) -> &str {
        "deletedomain <name>"
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
        let Some(name) = args.first() else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide a domain name."))
                .await;
        };

        self.api.delete_domain(name).await?;
        gateway
            .send_embed(
                msg.channel_id,
                Embed::success(format!("Deleted domain {name}.")),
            )
            .await
    }
}
