use std::sync::Arc;

use super::{
    location::LocationResolver,
    normalize::NormalizedRow,
    rules::{AgeRule, EmailRule, FieldRule, IdRule, LocationRule},
};

pub const ID_FIELD: &str = "id";
pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const AGE_FIELD: &str = "age";
pub const LOCATION_FIELD: &str = "location";

/// Columns the customer migration reads.
pub const CUSTOMER_COLUMNS: [&str; 5] = [ID_FIELD, NAME_FIELD, EMAIL_FIELD, AGE_FIELD, LOCATION_FIELD];

/// How a row is treated after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    /// Every rule passed.
    Accepted,
    /// Only the location rule failed; the row is stored with an unknown location.
    AcceptedWithWarning,
    /// The row is not stored.
    Rejected,
}

/// Names of the fields that failed, in rule table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    failing: Vec<String>,
}

impl ValidationOutcome {
    pub fn new<S: Into<String>>(failing: impl IntoIterator<Item = S>) -> Self {
        Self {
            failing: failing.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failing.is_empty()
    }

    pub fn failing_fields(&self) -> &[String] {
        &self.failing
    }

    pub fn has_failed(&self, field: &str) -> bool {
        self.failing.iter().any(|name| name == field)
    }

    /// A row is stored when nothing failed, or when the location is the only failure.
    pub fn classify(&self) -> RowClass {
        match self.failing.as_slice() {
            [] => RowClass::Accepted,
            [only] if only == LOCATION_FIELD => RowClass::AcceptedWithWarning,
            _ => RowClass::Rejected,
        }
    }

    pub fn is_insertable(&self) -> bool {
        self.classify() != RowClass::Rejected
    }

    /// Failing field names joined with commas, as shown in the error report.
    pub fn joined(&self) -> String {
        self.failing.join(",")
    }
}

/// Ordered mapping of field name to validation rule.
///
/// Rules are evaluated independently, so one row can fail several of them.
///
/// # Examples
///
/// ```
/// use customer_batch::customer::normalize::Normalizer;
/// use customer_batch::customer::row::RawRow;
/// use customer_batch::customer::validator::RuleTable;
///
/// let rules = RuleTable::default();
/// let row = Normalizer::default().normalize(&RawRow::from_pairs(
///     2,
///     [("id", "8"), ("name", "Jane Doe"), ("email", "not-an-email"), ("age", "16"), ("location", "Mars")],
/// ));
///
/// assert_eq!(rules.validate(&row).joined(), "email,age,location");
/// ```
pub struct RuleTable {
    rules: Vec<(String, Box<dyn FieldRule>)>,
}

impl Default for RuleTable {
    /// Customer rules: `id`, `email`, `age`, `location`, in that order.
    fn default() -> Self {
        Self::customer_rules(Arc::new(LocationResolver::default()))
    }
}

impl RuleTable {
    /// A table without rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Customer rules with the given location resolver.
    pub fn customer_rules(resolver: Arc<LocationResolver>) -> Self {
        Self::empty()
            .with_rule(ID_FIELD, IdRule)
            .with_rule(EMAIL_FIELD, EmailRule)
            .with_rule(AGE_FIELD, AgeRule::default())
            .with_rule(LOCATION_FIELD, LocationRule::new(resolver))
    }

    /// Sets the rule of `field`.
    ///
    /// A field that already has a rule keeps its position in the table.
    pub fn with_rule(mut self, field: &str, rule: impl FieldRule + 'static) -> Self {
        let rule: Box<dyn FieldRule> = Box::new(rule);
        match self.rules.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => entry.1 = rule,
            None => self.rules.push((field.to_string(), rule)),
        }
        self
    }

    /// Removes the rule of `field`, if any.
    pub fn without_rule(mut self, field: &str) -> Self {
        self.rules.retain(|(name, _)| name != field);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    pub fn validate(&self, row: &NormalizedRow) -> ValidationOutcome {
        ValidationOutcome::new(
            self.rules
                .iter()
                .filter(|(field, rule)| !rule.passes(row.get(field)))
                .map(|(field, _)| field.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::{normalize::Normalizer, row::RawRow};

    fn validate(pairs: &[(&str, &str)]) -> ValidationOutcome {
        let row = Normalizer::default().normalize(&RawRow::from_pairs(2, pairs.iter().copied()));
        RuleTable::default().validate(&row)
    }

    #[test]
    fn fully_valid_row() {
        let outcome = validate(&[
            ("id", "7"),
            ("name", "John Smith"),
            ("email", "john@example.com"),
            ("age", "30"),
            ("location", "Germany"),
        ]);

        assert!(outcome.is_valid());
        assert_eq!(outcome.classify(), RowClass::Accepted);
    }

    #[test]
    fn absent_optional_fields_pass() {
        let outcome = validate(&[("id", "9"), ("name", "Bob"), ("email", ""), ("age", ""), ("location", "")]);
        assert!(outcome.is_valid());
    }

    #[test]
    fn id_without_digits_is_rejected() {
        let outcome = validate(&[("id", "n/a"), ("email", "a@b.io")]);

        assert_eq!(outcome.failing_fields(), ["id"]);
        assert_eq!(outcome.classify(), RowClass::Rejected);
    }

    #[test]
    fn location_only_failure_is_tolerated() {
        let outcome = validate(&[("id", "9"), ("name", "Bob"), ("email", ""), ("age", ""), ("location", "Atlantis")]);

        assert_eq!(outcome.failing_fields(), ["location"]);
        assert_eq!(outcome.classify(), RowClass::AcceptedWithWarning);
        assert!(outcome.is_insertable());
    }

    #[test]
    fn location_with_another_failure_is_rejected() {
        let outcome = validate(&[("id", "9"), ("age", "12"), ("location", "Atlantis")]);

        assert_eq!(outcome.joined(), "age,location");
        assert_eq!(outcome.classify(), RowClass::Rejected);
    }

    #[test]
    fn failing_fields_follow_table_order() {
        let outcome = validate(&[("location", "Mars"), ("age", "16"), ("email", "nope"), ("id", "")]);
        assert_eq!(outcome.joined(), "id,email,age,location");
    }

    #[test]
    fn missing_id_column_fails_id() {
        let outcome = validate(&[("name", "Bob")]);
        assert!(outcome.has_failed("id"));
    }

    #[test]
    fn rules_can_be_replaced_in_place() {
        let rules = RuleTable::default().with_rule(EMAIL_FIELD, |_: Option<&str>| true);
        assert_eq!(rules.fields().collect::<Vec<_>>(), ["id", "email", "age", "location"]);

        let row = Normalizer::default().normalize(&RawRow::from_pairs(2, [("id", "1"), ("email", "nope")]));
        assert!(rules.validate(&row).is_valid());
    }

    #[test]
    fn rules_can_be_added_and_removed() {
        let rules = RuleTable::default()
            .without_rule(LOCATION_FIELD)
            .with_rule(NAME_FIELD, |value: Option<&str>| value.is_some());

        let row = Normalizer::default().normalize(&RawRow::from_pairs(2, [("id", "1"), ("location", "Mars")]));
        assert_eq!(rules.validate(&row).joined(), "name");
    }
}
