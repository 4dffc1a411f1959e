//! # Tasklet Module
//!
//! Single-task steps that run around the chunk-oriented import.

#[cfg(feature = "xlsx")]
#[cfg_attr(docsrs, doc(cfg(feature = "xlsx")))]
pub mod report;
