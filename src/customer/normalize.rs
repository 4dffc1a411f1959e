use super::row::RawRow;

/// Field names holding integers; all non-digit characters are stripped from them.
pub const DEFAULT_DIGIT_FIELDS: [&str; 2] = ["id", "age"];

/// A row after cleaning: every value trimmed, empty values absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    fields: Vec<(String, Option<String>)>,
}

impl NormalizedRow {
    /// Normalized value of `field`; `None` when absent or not in the header.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

/// Cleans raw values before validation.
///
/// Every value is trimmed and an empty result becomes absent. Digit fields
/// additionally lose every character that is not an ASCII digit, so
/// `"id: 42"` and `"4a2"` both become `"42"`, and a value with no digit at
/// all is absent rather than zero.
#[derive(Debug, Clone)]
pub struct Normalizer {
    digit_fields: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DIGIT_FIELDS)
    }
}

impl Normalizer {
    pub fn new<S: Into<String>>(digit_fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            digit_fields: digit_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn normalize(&self, row: &RawRow) -> NormalizedRow {
        let fields = row
            .headers()
            .iter()
            .zip(row.values())
            .map(|(name, value)| {
                let value = if self.is_digit_field(name) {
                    strip_non_digits(value)
                } else {
                    value.trim().to_string()
                };
                (name.clone(), (!value.is_empty()).then_some(value))
            })
            .collect();

        NormalizedRow { fields }
    }

    fn is_digit_field(&self, name: &str) -> bool {
        self.digit_fields.iter().any(|field| field == name)
    }
}

fn strip_non_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
