//! Locale-aware ordering of display text.
//!
//! # Invariants
//! - `compare` is a total order: collation ties fall back to code-point
//!   order, so distinct strings never compare equal.
//! - Construction from an unknown locale tag fails; the default collator
//!   never fails and uses the CLDR root order.

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::Locale;
use log::warn;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Locale tag of the CLDR root collation.
pub const ROOT_LOCALE: &str = "und";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollationError {
    /// The tag is not a BCP-47 locale.
    InvalidLocale(String),
    /// No collation data could be loaded for the locale.
    Unavailable { locale: String, reason: String },
}

impl Display for CollationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(tag) => write!(f, "invalid locale tag `{tag}`"),
            Self::Unavailable { locale, reason } => {
                write!(f, "no collation data for `{locale}`: {reason}")
            }
        }
    }
}

impl Error for CollationError {}

/// Orders tracker names and category titles for one locale.
pub struct TextCollator {
    locale: String,
    collator: Option<Collator>,
}

impl TextCollator {
    /// Builds a collator for a BCP-47 tag such as `ru` or `en-US`.
    pub fn for_locale(tag: &str) -> Result<Self, CollationError> {
        let locale: Locale = tag
            .trim()
            .parse()
            .map_err(|_| CollationError::InvalidLocale(tag.to_string()))?;
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        let collator = Collator::try_new(&(&locale).into(), options).map_err(|err| {
            CollationError::Unavailable {
                locale: locale.to_string(),
                reason: format!("{err:?}"),
            }
        })?;
        Ok(Self {
            locale: locale.to_string(),
            collator: Some(collator),
        })
    }

    /// Locale this collator orders for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Ascending display order of `a` and `b`.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match self.collator.as_ref() {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        collated.then_with(|| a.cmp(b))
    }
}

impl Default for TextCollator {
    fn default() -> Self {
        Self::for_locale(ROOT_LOCALE).unwrap_or_else(|err| {
            warn!("event=collator_init module=engine status=degraded error={err}");
            Self {
                locale: ROOT_LOCALE.to_string(),
                collator: None,
            }
        })
    }
}

impl Debug for TextCollator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCollator")
            .field("locale", &self.locale)
            .field("collated", &self.collator.is_some())
            .finish()
    }
}
