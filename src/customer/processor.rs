use std::sync::Arc;

use log::debug;

use crate::{
    BatchError,
    core::item::{ItemProcessor, ItemProcessorResult},
};

use super::{
    location::LocationResolver,
    normalize::{NormalizedRow, Normalizer},
    record::{Customer, UNKNOWN_LOCATION, split_full_name},
    row::RawRow,
    validator::{AGE_FIELD, EMAIL_FIELD, ID_FIELD, LOCATION_FIELD, NAME_FIELD, RuleTable, ValidationOutcome},
};

/// A row after validation, ready for the persistence sink and the error report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRow {
    /// Line of the row in the input file
    pub line: u64,
    /// Original values joined with the input delimiter
    pub raw: String,
    pub outcome: ValidationOutcome,
    /// The record to store, present when the outcome allows insertion
    pub customer: Option<Customer>,
}

/// Normalizes, validates and maps every row.
///
/// Validation failures are part of the output, not processing errors.
pub struct CustomerProcessor {
    normalizer: Normalizer,
    rules: RuleTable,
    resolver: Arc<LocationResolver>,
    delimiter: char,
}

impl Default for CustomerProcessor {
    fn default() -> Self {
        CustomerProcessorBuilder::new().build()
    }
}

impl CustomerProcessor {
    fn to_customer(&self, row: &NormalizedRow) -> Result<Customer, BatchError> {
        let id = row
            .get(ID_FIELD)
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| BatchError::ItemProcessor(format!("'{}' is not a valid id", row.get(ID_FIELD).unwrap_or_default())))?;

        let age = row
            .get(AGE_FIELD)
            .map(|age| {
                age.parse::<i32>()
                    .map_err(|_| BatchError::ItemProcessor(format!("'{}' is not a valid age", age)))
            })
            .transpose()?;

        let (name, surname) = split_full_name(row.get(NAME_FIELD));

        let (location, country_code) = match row.get(LOCATION_FIELD) {
            None => (None, None),
            Some(candidate) => match self.resolver.resolve(candidate) {
                Some(country) => (Some(country.name.to_string()), Some(country.alpha3.to_string())),
                None => (Some(UNKNOWN_LOCATION.to_string()), None),
            },
        };

        Ok(Customer {
            id,
            name,
            surname,
            email: row.get(EMAIL_FIELD).map(str::to_string),
            age,
            location,
            country_code,
        })
    }
}

impl ItemProcessor<RawRow, ProcessedRow> for CustomerProcessor {
    fn process(&self, item: &RawRow) -> ItemProcessorResult<ProcessedRow> {
        let normalized = self.normalizer.normalize(item);
        let outcome = self.rules.validate(&normalized);

        let customer = if outcome.is_insertable() {
            Some(self.to_customer(&normalized)?)
        } else {
            None
        };

        if !outcome.is_valid() {
            debug!("Line {}: failing fields {}", item.line(), outcome.joined());
        }

        Ok(ProcessedRow {
            line: item.line(),
            raw: item.joined(self.delimiter),
            outcome,
            customer,
        })
    }
}

/// Builder for [`CustomerProcessor`].
///
/// Defaults: digit fields `id` and `age`, the customer rule table, the
/// ISO 3166-1 resolver and a comma delimiter.
pub struct CustomerProcessorBuilder {
    normalizer: Option<Normalizer>,
    rules: Option<RuleTable>,
    resolver: Option<Arc<LocationResolver>>,
    delimiter: char,
}

impl Default for CustomerProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerProcessorBuilder {
    pub fn new() -> Self {
        Self {
            normalizer: None,
            rules: None,
            resolver: None,
            delimiter: ',',
        }
    }

    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Resolver used to map locations; also backs the default location rule.
    pub fn resolver(mut self, resolver: Arc<LocationResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Delimiter used to join raw values for the error report.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn build(self) -> CustomerProcessor {
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(LocationResolver::default()));
        let rules = self
            .rules
            .unwrap_or_else(|| RuleTable::customer_rules(Arc::clone(&resolver)));

        CustomerProcessor {
            normalizer: self.normalizer.unwrap_or_default(),
            rules,
            resolver,
            delimiter: self.delimiter,
        }
    }
}
