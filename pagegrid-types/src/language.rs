use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a content language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(i64);

impl LanguageId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LanguageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// The language a request acts in, resolved by the caller before any
/// fetch, diff or persist call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageContext {
    /// Language of the current request.
    pub current: LanguageId,
    /// Configured default language. Its content doubles as the fallback copy.
    pub default: LanguageId,
}

impl LanguageContext {
    #[must_use]
    pub const fn new(current: LanguageId, default: LanguageId) -> Self {
        Self { current, default }
    }

    /// Context whose current language is the default language.
    #[must_use]
    pub const fn default_only(default: LanguageId) -> Self {
        Self { current: default, default }
    }

    /// True if the current language is the default language.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.current == self.default
    }
}
