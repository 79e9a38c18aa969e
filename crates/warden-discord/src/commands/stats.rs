use std::sync::Arc;

use async_trait::async_trait;

use warden_api::ApiClient;
use warden_core::{
    domain::{InboundMessage, Permission},
    embed::{Embed, COLOR_INFO},
    ports::ChatGateway,
    registry::Command,
    Result,
};

use super::EVERYONE;

pub struct Stats {
    api: Arc<ApiClient>,
}

impl Stats {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for Stats {
    fn name(&self) -> &str {
        "stats"
    }
    fn description(&self) -> &str {
        "Show service-wide statistics."
    }
    fn usage(&self) -> &str {
        "stats"
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
        let stats = self.api.total_stats().await?;

        let embed = Embed::new()
            .title("Service statistics")
            .color(COLOR_INFO)
            .field(
                "Users",
                format!(
                    "{} total\n{} premium\n{} blacklisted",
                    stats.total_users, stats.premium, stats.total_bans
                ),
                true,
            )
            .field(
                "Files",
                format!("{} uploaded\n{} stored", stats.total_files, fmt_bytes(stats.storage_used)),
                true,
            )
            .field("Domains", stats.count.to_string(), true);

        gateway.send_embed(msg.channel_id, embed).await
    }
}

fn fmt_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
