use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::location::LocationResolver;

/// Inclusive bounds of the age rule.
pub const MIN_AGE: u64 = 18;
pub const MAX_AGE: u64 = 99;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;

static EMAIL_LOCAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("valid local part pattern")
});

static EMAIL_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
        .expect("valid domain pattern")
});

/// A check applied to one normalized field.
///
/// `value` is `None` when the field is absent. Returns `true` when the value
/// passes.
pub trait FieldRule {
    fn passes(&self, value: Option<&str>) -> bool;
}

impl<F> FieldRule for F
where
    F: Fn(Option<&str>) -> bool,
{
    fn passes(&self, value: Option<&str>) -> bool {
        self(value)
    }
}

/// Required, and must fit a signed 64-bit integer.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdRule;

impl FieldRule for IdRule {
    fn passes(&self, value: Option<&str>) -> bool {
        value.is_some_and(|id| id.parse::<i64>().is_ok())
    }
}

/// Optional; when present, a syntactically valid address.
///
/// The domain must have at least two labels. No DNS lookup is made.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailRule;

impl FieldRule for EmailRule {
    fn passes(&self, value: Option<&str>) -> bool {
        value.is_none_or(is_valid_email)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    local.len() <= MAX_LOCAL_PART_LENGTH
        && EMAIL_LOCAL_PART.is_match(local)
        && EMAIL_DOMAIN.is_match(domain)
}

/// Optional; when present, an integer within `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct AgeRule {
    pub min: u64,
    pub max: u64,
}

impl Default for AgeRule {
    fn default() -> Self {
        Self {
            min: MIN_AGE,
            max: MAX_AGE,
        }
    }
}

impl FieldRule for AgeRule {
    fn passes(&self, value: Option<&str>) -> bool {
        match value {
            None => true,
            // Digit strings too long for u64 are out of range anyway.
            Some(age) => age
                .parse::<u64>()
                .is_ok_and(|age| (self.min..=self.max).contains(&age)),
        }
    }
}

/// Optional; when present, a country name known to the resolver.
#[derive(Debug, Clone)]
pub struct LocationRule {
    resolver: Arc<LocationResolver>,
}

impl LocationRule {
    pub fn new(resolver: Arc<LocationResolver>) -> Self {
        Self { resolver }
    }
}

impl FieldRule for LocationRule {
    fn passes(&self, value: Option<&str>) -> bool {
        value.is_none_or(|name| self.resolver.resolve(name).is_some())
    }
}
