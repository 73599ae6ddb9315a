//! Ordered keyword rule table.
//!
//! Categories are evaluated top to bottom; the first one with a keyword
//! contained in the lowercased input wins. Matching is plain substring
//! containment, so "hi" also fires inside "this".

mod builtin;

use crate::error::CoreError;
use kozi_config::ResponderConfig;
use log::debug;

/// Name reported for the fallback category.
pub const FALLBACK_CATEGORY: &str = "default";

/// Trigger keywords plus the replies to pick from when one matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    keywords: Vec<String>,
    replies: Vec<String>,
}

impl Category {
    /// Build a category. Keywords are lowercased and blank ones dropped;
    /// replies must be non-empty.
    pub fn new(
        name: impl Into<String>,
        keywords: impl IntoIterator<Item = impl Into<String>>,
        replies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|keyword| keyword.into().to_lowercase())
            .filter(|keyword| !keyword.trim().is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(CoreError::NoKeywords(name));
        }
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            return Err(CoreError::EmptyCategory(name));
        }
        Ok(Self {
            name,
            keywords,
            replies,
        })
    }

    fn fallback(replies: Vec<String>) -> Result<Self, CoreError> {
        if replies.is_empty() {
            return Err(CoreError::EmptyFallback);
        }
        Ok(Self {
            name: FALLBACK_CATEGORY.to_string(),
            keywords: Vec::new(),
            replies,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Candidate replies; never empty.
    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// True when the already-lowercased input contains any keyword.
    fn matches(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }
}

/// Categories in priority order plus the fallback used when none match.
#[derive(Debug, Clone)]
pub struct RuleTable {
    categories: Vec<Category>,
    fallback: Category,
}

impl RuleTable {
    /// Build a table from ordered categories and fallback replies.
    pub fn new(categories: Vec<Category>, fallback: Vec<String>) -> Result<Self, CoreError> {
        Ok(Self {
            categories,
            fallback: Category::fallback(fallback)?,
        })
    }

    /// The built-in table: greeting, help, job, profile, payment, guidelines,
    /// thanks, goodbye.
    pub fn builtin() -> Self {
        Self {
            categories: builtin_categories(),
            fallback: builtin_fallback(),
        }
    }

    /// Build the table from config, using the built-in parts for anything unset.
    pub fn from_config(config: &ResponderConfig) -> Result<Self, CoreError> {
        let categories = match &config.rules {
            Some(rules) => rules
                .iter()
                .map(|rule| Category::new(&rule.name, &rule.keywords, &rule.replies))
                .collect::<Result<Vec<_>, _>>()?,
            None => builtin_categories(),
        };
        let fallback = match &config.fallback {
            Some(replies) => Category::fallback(replies.clone())?,
            None => builtin_fallback(),
        };
        debug!(
            "rule table built (categories={}, custom_rules={}, custom_fallback={})",
            categories.len(),
            config.rules.is_some(),
            config.fallback.is_some()
        );
        Ok(Self {
            categories,
            fallback,
        })
    }

    /// Select the category for an input. Never fails; unmatched input maps to
    /// the fallback.
    pub fn classify(&self, input: &str) -> &Category {
        let normalized = input.to_lowercase();
        self.categories
            .iter()
            .find(|category| category.matches(&normalized))
            .unwrap_or(&self.fallback)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn fallback(&self) -> &Category {
        &self.fallback
    }

    /// Look up a category by name, including the fallback.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|category| category.name == name)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_categories() -> Vec<Category> {
    builtin::CATEGORIES
        .iter()
        .map(|(name, keywords, replies)| Category {
            name: (*name).to_string(),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
            replies: replies.iter().map(|reply| reply.to_string()).collect(),
        })
        .collect()
}

fn builtin_fallback() -> Category {
    Category {
        name: FALLBACK_CATEGORY.to_string(),
        keywords: Vec::new(),
        replies: builtin::FALLBACK.iter().map(|reply| reply.to_string()).collect(),
    }
}
