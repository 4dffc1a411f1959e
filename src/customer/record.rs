use serde::{Deserialize, Serialize};

/// Display value stored when a location could not be resolved but the row is
/// still inserted.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// A persisted customer.
///
/// `id` comes from the input file and is never generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub country_code: Option<String>,
}

/// Splits a full name on its first space.
///
/// The given name is what precedes the first space, the family name is the
/// remainder. A name without a space has no family name.
///
/// ```
/// use customer_batch::customer::record::split_full_name;
///
/// assert_eq!(
///     split_full_name(Some("Mary Ann Smith")),
///     (Some("Mary".to_string()), Some("Ann Smith".to_string()))
/// );
/// assert_eq!(split_full_name(Some("Bob")), (Some("Bob".to_string()), None));
/// assert_eq!(split_full_name(None), (None, None));
/// ```
pub fn split_full_name(full_name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(full_name) = full_name else {
        return (None, None);
    };

    match full_name.split_once(' ') {
        Some((given, family)) => (non_empty(given), non_empty(family)),
        None => (non_empty(full_name), None),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
