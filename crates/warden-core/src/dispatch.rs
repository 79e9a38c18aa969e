//! Command dispatch: one state machine per inbound message.
//!
//! Terminal states are mostly silent on purpose: ordinary chat, unknown
//! commands and permission denials all end without a reply. The only
//! user-visible failure is an error embed rendered here when a command body
//! returns an error; nothing escapes the dispatcher.

use tracing::{debug, error, warn};

use crate::{
    domain::{ChannelId, InboundMessage},
    embed::Embed,
    errors::Error,
    ports::ChatGateway,
    registry::CommandRegistry,
};

/// One parsed attempt to run a command, derived from one chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub raw: String,
    pub prefix: String,
    pub name: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Returns `None` when the content does not start with the prefix:
    /// ordinary chat, not an error.
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let rest = content.strip_prefix(prefix)?;
        let mut tokens = rest.trim().split_whitespace();
        let name = tokens.next().unwrap_or("").to_lowercase();
        let args = tokens.map(str::to_string).collect();

        Some(Self {
            raw: content.to_string(),
            prefix: prefix.to_string(),
            name,
            args,
        })
    }
}

/// Structural constraint some channels enforce on plain content.
#[derive(Clone, Debug)]
pub enum ChannelRule {
    /// Messages must start with this exact string.
    RequirePrefix(String),
    /// Messages must equal this token, case-insensitively.
    RequireExact(String),
}

#[derive(Clone, Debug)]
pub struct ChannelPolicy {
    pub channel_id: ChannelId,
    pub rule: ChannelRule,
}

impl ChannelPolicy {
    fn violates(&self, content: &str) -> bool {
        match &self.rule {
            ChannelRule::RequirePrefix(p) => !content.starts_with(p.as_str()),
            ChannelRule::RequireExact(token) => !content.eq_ignore_ascii_case(token),
        }
    }
}

pub struct Dispatcher {
    prefix: String,
    policies: Vec<ChannelPolicy>,
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new(prefix: String, policies: Vec<ChannelPolicy>, registry: CommandRegistry) -> Self {
        Self {
            prefix,
            policies,
            registry,
        }
    }

    pub async fn dispatch(&self, gateway: &dyn ChatGateway, msg: &InboundMessage) {
        // Automated accounts never trigger anything.
        if msg.author.is_bot {
            return;
        }

        // Channel policies run before prefix detection; a violation deletes
        // the message and terminates without a reply.
        for policy in self.policies.iter().filter(|p| p.channel_id == msg.channel_id) {
            if policy.violates(&msg.content) {
                if let Err(e) = gateway.delete_message(msg.channel_id, msg.id).await {
                    warn!("failed to delete policy-violating message: {e}");
                }
                return;
            }
        }

        let Some(invocation) = Invocation::parse(&msg.content, &self.prefix) else {
            return;
        };

        // Unknown names are indistinguishable from non-command chat.
        let Some(command) = self.registry.resolve(&invocation.name) else {
            return;
        };

        // The gate only applies inside guilds; direct messages bypass it.
        if msg.guild_id.is_some() {
            let held = msg.member_permissions.clone().unwrap_or_default();
            if !held.contains_all(command.permissions()) {
                debug!(
                    command = %invocation.name,
                    user = msg.author.id.0,
                    "permission denied, dropping silently"
                );
                return;
            }
        }

        if let Err(err) = command.run(gateway, msg, &invocation.args).await {
            match &err {
                // Transport problems get full detail in the log since the
                // user-visible message may be uninformative.
                Error::Transport(_) | Error::Gateway(_) => {
                    error!(command = %invocation.name, "command failed: {err}")
                }
                _ => debug!(command = %invocation.name, "command failed: {err}"),
            }

            let reply = Embed::error(err.to_string());
            if let Err(e) = gateway.send_embed(msg.channel_id, reply).await {
                warn!("failed to deliver error reply: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{Author, GuildId, MessageId, Permission, UserId},
        registry::Command,
        Result,
    };

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        SendText(ChannelId, String),
        SendEmbed(ChannelId, Embed),
        Delete(ChannelId, MessageId),
        Leave(GuildId),
    }

    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingGateway {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatGateway for RecordingGateway {
        async fn send_text(&self, channel: ChannelId, text: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::SendText(channel, text.to_string()));
            Ok(())
        }
        async fn send_embed(&self, channel: ChannelId, embed: Embed) -> Result<()> {
            self.calls.lock().unwrap().push(Call::SendEmbed(channel, embed));
            Ok(())
        }
        async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Delete(channel, message));
            Ok(())
        }
        async fn leave_guild(&self, guild: GuildId) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Leave(guild));
            Ok(())
        }
    }

    struct StubCommand {
        name: &'static str,
        permissions: Vec<Permission>,
        runs: Arc<AtomicUsize>,
        seen_args: Arc<Mutex<Vec<String>>>,
        fail_with: Option<fn() -> Error>,
    }

    impl StubCommand {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                permissions: vec![],
                runs: Arc::new(AtomicUsize::new(0)),
                seen_args: Arc::new(Mutex::new(vec![])),
                fail_with: None,
            }
        }
    }

    #[async_trait]
    impl Command for StubCommand {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "stub"
        }
        fn usage(&self) -> &str {
            self.name
        }
        fn permissions(&self) -> &[Permission] {
            &self.permissions
        }
        async fn run(
            &self,
            _gateway: &dyn ChatGateway,
            _msg: &InboundMessage,
            args: &[String],
        ) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            *self.seen_args.lock().unwrap() = args.to_vec();
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }
    }

    fn guild_message(content: &str, permissions: &[Permission]) -> InboundMessage {
        InboundMessage {
            id: MessageId(1),
            channel_id: ChannelId(10),
            guild_id: Some(GuildId(99)),
            author: Author {
                id: UserId(7),
                is_bot: false,
            },
            content: content.to_string(),
            mentions: vec![],
            member_permissions: Some(permissions.iter().copied().collect()),
        }
    }

    fn dm_message(content: &str) -> InboundMessage {
        InboundMessage {
            guild_id: None,
            member_permissions: None,
            ..guild_message(content, &[])
        }
    }

    fn dispatcher_with(commands: Vec<StubCommand>) -> Dispatcher {
        let mut registry = CommandRegistry::default();
        for cmd in commands {
            registry.register(Arc::new(cmd)).unwrap();
        }
        Dispatcher::new(",".to_string(), vec![], registry)
    }

    #[test]
    fn tokenization_splits_on_whitespace_runs() {
        let inv = Invocation::parse(",lookup  abc123", ",").unwrap();
        assert_eq!(inv.name, "lookup");
        assert_eq!(inv.args, vec!["abc123".to_string()]);

        let inv = Invocation::parse(",GIVEINV  a   b\tc", ",").unwrap();
        assert_eq!(inv.name, "giveinv");
        assert_eq!(
            inv.args,
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn non_prefixed_content_is_not_an_invocation() {
        assert!(Invocation::parse("hello there", ",").is_none());
        assert!(Invocation::parse("lookup abc", ",").is_none());
    }

    #[tokio::test]
    async fn plain_chat_produces_no_reply() {
        let cmd = StubCommand::new("lookup");
        let runs = cmd.runs.clone();
        let dispatcher = dispatcher_with(vec![cmd]);
        let gateway = RecordingGateway::default();

        dispatcher
            .dispatch(&gateway, &guild_message("just chatting", &[]))
            .await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn bot_authors_are_ignored_entirely() {
        let cmd = StubCommand::new("lookup");
        let runs = cmd.runs.clone();
        let dispatcher = dispatcher_with(vec![cmd]);
        let gateway = RecordingGateway::default();

        let mut msg = guild_message(",lookup abc", &[Permission::SendMessages]);
        msg.author.is_bot = true;
        dispatcher.dispatch(&gateway, &msg).await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_terminates_silently() {
        let dispatcher = dispatcher_with(vec![StubCommand::new("lookup")]);
        let gateway = RecordingGateway::default();

        dispatcher
            .dispatch(&gateway, &guild_message(",doesnotexist", &[]))
            .await;

        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn command_name_is_matched_case_insensitively() {
        let cmd = StubCommand::new("lookup");
        let runs = cmd.runs.clone();
        let args = cmd.seen_args.clone();
        let dispatcher = dispatcher_with(vec![cmd]);
        let gateway = RecordingGateway::default();

        dispatcher
            .dispatch(
                &gateway,
                &guild_message(",LOOKUP abc123", &[Permission::SendMessages]),
            )
            .await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(*args.lock().unwrap(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn missing_permission_blocks_execution_silently() {
        let mut cmd = StubCommand::new("wipe");
        cmd.permissions = vec![Permission::SendMessages, Permission::Administrator];
        let runs = cmd.runs.clone();
        let dispatcher = dispatcher_with(vec![cmd]);
        let gateway = RecordingGateway::default();

        // Holds one of the two required permissions.
        dispatcher
            .dispatch(
                &gateway,
                &guild_message(",wipe abc", &[Permission::SendMessages]),
            )
            .await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn direct_messages_bypass_the_permission_gate() {
        let mut cmd = StubCommand::new("wipe");
        cmd.permissions = vec![Permission::SendMessages, Permission::Administrator];
        let runs = cmd.runs.clone();
        let dispatcher = dispatcher_with(vec![cmd]);
        let gateway = RecordingGateway::default();

        dispatcher.dispatch(&gateway, &dm_message(",wipe abc")).await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn command_error_becomes_a_single_error_embed() {
        let mut cmd = StubCommand::new("lookup");
        cmd.fail_with = Some(|| Error::Backend("User not found.".to_string()));
        let dispatcher = dispatcher_with(vec![cmd]);
        let gateway = RecordingGateway::default();

        dispatcher
            .dispatch(&gateway, &guild_message(",lookup abc", &[]))
            .await;

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::SendEmbed(channel, embed) => {
                assert_eq!(*channel, ChannelId(10));
                assert_eq!(embed.description.as_deref(), Some("User not found."));
                assert_eq!(embed.color, Some(crate::embed::COLOR_ERROR));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn policy_violations_delete_without_reply() {
        let mut registry = CommandRegistry::default();
        registry.register(Arc::new(StubCommand::new("suggest"))).unwrap();
        let dispatcher = Dispatcher::new(
            ",".to_string(),
            vec![
                ChannelPolicy {
                    channel_id: ChannelId(10),
                    rule: ChannelRule::RequirePrefix(",suggest".to_string()),
                },
                ChannelPolicy {
                    channel_id: ChannelId(11),
                    rule: ChannelRule::RequireExact("wave".to_string()),
                },
            ],
            registry,
        );
        let gateway = RecordingGateway::default();

        dispatcher
            .dispatch(&gateway, &guild_message("off topic chatter", &[]))
            .await;
        assert_eq!(
            gateway.calls(),
            vec![Call::Delete(ChannelId(10), MessageId(1))]
        );

        // Exact-token channel accepts the token in any case.
        let gateway = RecordingGateway::default();
        let mut msg = guild_message("WAVE", &[]);
        msg.channel_id = ChannelId(11);
        dispatcher.dispatch(&gateway, &msg).await;
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn conforming_policy_content_still_dispatches() {
        let mut registry = CommandRegistry::default();
        let cmd = StubCommand::new("suggest");
        let runs = cmd.runs.clone();
        registry.register(Arc::new(cmd)).unwrap();
        let dispatcher = Dispatcher::new(
            ",".to_string(),
            vec![ChannelPolicy {
                channel_id: ChannelId(10),
                rule: ChannelRule::RequirePrefix(",suggest".to_string()),
            }],
            registry,
        );
        let gateway = RecordingGateway::default();

        dispatcher
            .dispatch(&gateway, &guild_message(",suggest add dark mode", &[]))
            .await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(gateway.calls().is_empty());
    }
}
