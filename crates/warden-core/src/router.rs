//! Maps platform lifecycle events onto the dispatcher and the guild
//! allow-list.

use tracing::{info, warn};

use crate::{
    dispatch::Dispatcher,
    domain::{GuildId, GuildJoin, InboundMessage},
    ports::ChatGateway,
};

/// Posted to an unauthorized guild before leaving, best-effort.
const REJECTION_NOTICE: &str = "This bot is private to a single server.";

pub struct EventRouter {
    dispatcher: Dispatcher,
    home_guild: GuildId,
}

impl EventRouter {
    pub fn new(dispatcher: Dispatcher, home_guild: GuildId) -> Self {
        Self {
            dispatcher,
            home_guild,
        }
    }

    pub async fn message(&self, gateway: &dyn ChatGateway, msg: InboundMessage) {
        self.dispatcher.dispatch(gateway, &msg).await;
    }

    /// A static allow-list of exactly one guild: anywhere else, post a
    /// one-line notice (failure is swallowed) and leave unconditionally.
    pub async fn guild_joined(&self, gateway: &dyn ChatGateway, join: GuildJoin) {
        if join.guild_id == self.home_guild {
            return;
        }

        info!(guild = join.guild_id.0, "joined unauthorized guild, leaving");

        if let Some(channel) = join.first_channel {
            if let Err(e) = gateway.send_text(channel, REJECTION_NOTICE).await {
                warn!("failed to post rejection notice: {e}");
            }
        }

        if let Err(e) = gateway.leave_guild(join.guild_id).await {
            warn!("failed to leave guild {}: {e}", join.guild_id.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        dispatch::Dispatcher,
        domain::{ChannelId, MessageId},
        embed::Embed,
        errors::Error,
        registry::CommandRegistry,
        Result,
    };

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        SendText(ChannelId, String),
        Leave(GuildId),
    }

    #[derive(Default)]
    struct FlakyGateway {
        fail_sends: bool,
        calls: Mutex<Vec<Call>>,
    }

    #[async_trait]
    impl ChatGateway for FlakyGateway {
        async fn send_text(&self, channel: ChannelId, text: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::SendText(channel, text.to_string()));
            if self.fail_sends {
                return Err(Error::Gateway("missing permissions".to_string()));
            }
            Ok(())
        }
        async fn send_embed(&self, _channel: ChannelId, _embed: Embed) -> Result<()> {
            Ok(())
        }
        async fn delete_message(&self, _channel: ChannelId, _message: MessageId) -> Result<()> {
            Ok(())
        }
        async fn leave_guild(&self, guild: GuildId) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Leave(guild));
            Ok(())
        }
    }

    fn router() -> EventRouter {
        let dispatcher = Dispatcher::new(",".to_string(), vec![], CommandRegistry::default());
        EventRouter::new(dispatcher, GuildId(42))
    }

    #[tokio::test]
    async fn home_guild_join_is_a_no_op() {
        let gateway = FlakyGateway::default();
        router()
            .guild_joined(
                &gateway,
                GuildJoin {
                    guild_id: GuildId(42),
                    first_channel: Some(ChannelId(1)),
                },
            )
            .await;

        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_join_posts_notice_then_leaves() {
        let gateway = FlakyGateway::default();
        router()
            .guild_joined(
                &gateway,
                GuildJoin {
                    guild_id: GuildId(7),
                    first_channel: Some(ChannelId(1)),
                },
            )
            .await;

        let calls = gateway.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], Call::SendText(ChannelId(1), _)));
        assert_eq!(calls[1], Call::Leave(GuildId(7)));
    }

    #[tokio::test]
    async fn leave_happens_even_when_the_notice_fails() {
        let gateway = FlakyGateway {
            fail_sends: true,
            ..FlakyGateway::default()
        };
        router()
            .guild_joined(
                &gateway,
                GuildJoin {
                    guild_id: GuildId(7),
                    first_channel: Some(ChannelId(1)),
                },
            )
            .await;

        let calls = gateway.calls.lock().unwrap().clone();
        assert_eq!(calls.last(), Some(&Call::Leave(GuildId(7))));
    }

    #[tokio::test]
    async fn leave_happens_with_no_postable_channel() {
        let gateway = FlakyGateway::default();
        router()
            .guild_joined(
                &gateway,
                GuildJoin {
                    guild_id: GuildId(7),
                    first_channel: None,
                },
            )
            .await;

        assert_eq!(
            gateway.calls.lock().unwrap().clone(),
            vec![Call::Leave(GuildId(7))]
        );
    }
}
