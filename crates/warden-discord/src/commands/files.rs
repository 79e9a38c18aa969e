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

use super::ADMIN;

pub struct DeleteImage {
    api: Arc<ApiClient>,
}

impl DeleteImage {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for DeleteImage {
    fn name(&self) -> &str {
        "deleteimage"
    }
    fn description(&self) -> &str {
        "Delete an uploaded image."
    }
    fn usage(&self) -> &str {
        "deleteimage <filename>"
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
        let Some(filename) = args.first() else {
            return gateway
                .send_embed(msg.channel_id, Embed::error("Provide a filename."))
                .await;
        };

        self.api.delete_image(filename).await?;
        gateway
            .send_embed(
                msg.channel_id,
                Embed::success(format!("Deleted {filename}.")),
            )
            .await
    }
}
