use std::sync::Arc;

use async_trait::async_trait;

use warden_core::{
    domain::{InboundMessage, Permission},
    embed::{Embed, COLOR_INFO},
    ports::ChatGateway,
    registry::Command,
    Result,
};

use super::EVERYONE;

/// Lists every registered command.
///
/// The listing is snapshotted from the other descriptors before
/// registration, so the registry itself stays immutable and help never has
/// to look itself up.
pub struct Help {
    listing: String,
}

impl Help {
    pub fn new(prefix: &str, commands: &[Arc<dyn Command>]) -> Self {
        let mut lines: Vec<String> = commands
            .iter()
            .map(|c| format!("`{prefix}{}` - {}", c.usage(), c.description()))
            .collect();
        lines.sort();
        lines.push(format!("`{prefix}help` - Show this listing."));

        Self {
            listing: lines.join("\n"),
        }
    }
}

#[async_trait]
impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "Show this listing."
    }
    fn usage(&self) -> &str {
        "help"
    }
    fn permissions(&self) -> &[Permission] {
        EVERYONE
    }

    async fn run(
        &self,
        gateway: &dyn ChatGateway,
        msg: &InboundMessage,
        _args: &[String],
    ) -> Result<()> {
        let embed = Embed::new()
            .title("Commands")
            .color(COLOR_INFO)
            .description(self.listing.clone());
        gateway.send_embed(msg.channel_id, embed).await
    }
}
