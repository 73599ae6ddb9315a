//! Keyword responder and the reply generation seam.

use crate::error::CoreError;
use crate::random::{RandomSource, SeededRandom, ThreadRandom};
use crate::rules::RuleTable;
use async_trait::async_trait;
use kozi_config::ResponderConfig;
use log::debug;
use std::sync::Arc;

/// Produces the bot reply for a submitted message.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate a reply for non-empty, trimmed input.
    async fn generate(&self, input: &str) -> Result<String, CoreError>;
}

/// Canned-reply responder driven by a [`RuleTable`].
#[derive(Clone)]
pub struct Responder {
    rules: RuleTable,
    random: Arc<dyn RandomSource>,
}

impl Responder {
    pub fn new(rules: RuleTable, random: Arc<dyn RandomSource>) -> Self {
        Self { rules, random }
    }

    /// Build from config: custom rules when set, seeded RNG when a seed is given.
    pub fn from_config(config: &ResponderConfig) -> Result<Self, CoreError> {
        let random: Arc<dyn RandomSource> = match config.seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };
        Ok(Self::new(RuleTable::from_config(config)?, random))
    }

    /// Pick a reply for the input. Total over all strings.
    pub fn respond(&self, input: &str) -> String {
        let category = self.rules.classify(input);
        let replies = category.replies();
        let index = self.random.next_index(replies.len()) % replies.len();
        debug!(
            "responder matched (category={}, reply_index={})",
            category.name(),
            index
        );
        replies[index].clone()
    }

    /// Name of the category an input maps to.
    pub fn classify(&self, input: &str) -> &str {
        self.rules.classify(input).name()
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(RuleTable::builtin(), Arc::new(ThreadRandom))
    }
}

#[async_trait]
impl ReplyGenerator for Responder {
    async fn generate(&self, input: &str) -> Result<String, CoreError> {
        Ok(self.respond(input))
    }
}

#[cfg(test)]
mod tests {
    use super::{ReplyGenerator, Responder};
    use crate::random::{RandomSource, SeededRandom};
    use crate::rules::RuleTable;
    use kozi_config::ResponderConfig;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Always picks the given index.
    struct FixedIndex(usize);

    impl RandomSource for FixedIndex {
        fn next_index(&self, _upper: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn respond_uses_random_index_within_category() {
        let responder = Responder::new(RuleTable::builtin(), Arc::new(FixedIndex(2)));
        assert_eq!(
            responder.respond("hey"),
            "Hey! I'm here to help. What do you need?"
        );
        assert_eq!(
            responder.respond("I want to upgrade"),
            "I'm here to assist with payment questions. What billing or subscription help do you need?"
        );
    }

    #[test]
    fn every_reply_belongs_to_classified_category() {
        let responder = Responder::new(RuleTable::builtin(), Arc::new(SeededRandom::new(3)));
        for input in ["Hi", "HELLO", "what is this", "my account", "bye now", "zzz"] {
            let reply = responder.respond(input);
            let category = responder.rules().category(responder.classify(input));
            assert!(!reply.is_empty());
            assert!(category.expect("category").replies().contains(&reply));
        }
    }

    #[test]
    fn seeded_responders_agree() {
        let config = ResponderConfig {
            seed: Some(99),
            ..ResponderConfig::default()
        };
        let a = Responder::from_config(&config).expect("responder");
        let b = Responder::from_config(&config).expect("responder");
        for _ in 0..8 {
            assert_eq!(a.respond("hello"), b.respond("hello"));
        }
    }

    #[tokio::test]
    async fn generator_never_fails() {
        let responder = Responder::default();
        let reply = responder.generate("qqq zzz").await.expect("reply");
        assert!(responder.rules().fallback().replies().contains(&reply));
    }
}
