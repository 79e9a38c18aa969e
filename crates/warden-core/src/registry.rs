use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{InboundMessage, Permission},
    errors::Error,
    ports::ChatGateway,
    Result,
};

/// A chat command: static descriptor plus the executable body.
///
/// Commands are plain values; registration is composition, not subclassing.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Display string shown in help output, e.g. `lookup <uuid/uid/discord>`.
    fn usage(&self) -> &str;
    /// Capabilities the invoking guild member must hold. Empty means open.
    fn permissions(&self) -> &[Permission] {
        &[]
    }

    async fn run(
        &self,
        gateway: &dyn ChatGateway,
        msg: &InboundMessage,
        args: &[String],
    ) -> Result<()>;
}

/// Lookup table from invocation name to command.
///
/// Populated once at startup, read-only afterwards. Duplicate names are a
/// startup error rather than a silent override.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn register(&mut self, command: Arc<dyn Command>) -> Result<()> {
        let key = command.name().to_lowercase();
        match self.commands.entry(key) {
            Entry::Occupied(e) => Err(Error::Config(format!(
                "duplicate command name: {}",
                e.key()
            ))),
            Entry::Vacant(e) => {
                e.insert(command);
                Ok(())
            }
        }
    }

    /// Case handling matches the dispatcher: names are lower-cased.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy(&'static str);

    #[async_trait]
    impl Command for Dummy {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "dummy"
        }
        fn usage(&self) -> &str {
            self.0
        }
        async fn run(
            &self,
            _gateway: &dyn ChatGateway,
            _msg: &InboundMessage,
            _args: &[String],
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn duplicate_registration_is_a_startup_error() {
        let mut registry = CommandRegistry::default();
        registry.register(Arc::new(Dummy("lookup"))).unwrap();

        let err = registry.register(Arc::new(Dummy("Lookup"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got: {err:?}");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let mut registry = CommandRegistry::default();
        registry.register(Arc::new(Dummy("stats"))).unwrap();

        assert!(registry.resolve("STATS").is_some());
        assert!(registry.resolve("stats").is_some());
        assert!(registry.resolve("nope").is_none());
    }
}
