//! Customer migration: from a raw CSV row to a stored customer or a report entry.
//!
//! Each row goes through the same stages:
//!
//! 1. [`normalize`] trims values and keeps only digits in `id` and `age`.
//! 2. [`validator`] applies the rule table and lists the failing fields.
//! 3. [`processor`] classifies the row and maps it to a [`record::Customer`].
//! 4. [`writer`] stores new customers through a [`repository::CustomerRepository`].
//! 5. [`report`] collects the failing rows for the error report.

pub(crate) mod iso3166;
pub mod location;
pub mod normalize;
pub mod processor;
pub mod record;
pub mod report;
pub mod repository;
pub mod row;
pub mod rules;
pub mod validator;
pub mod writer;
