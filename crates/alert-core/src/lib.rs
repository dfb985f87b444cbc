//! Shared alert types for the Oref alert relay.
//!
//! This crate holds the pieces every other crate in the relay agrees on:
//!
//! - [`Alert`] - The canonical alert entity stored and distributed by the relay
//! - [`CategoryCode`] / [`AlertType`] - Upstream category codes and their stable labels
//! - [`filter_test_cities`] - Removal of test entries from an alert's city list
//! - [`normalize_timestamp`] / [`now_timestamp`] - Canonical ISO-8601 timestamps
//!
//! # Example
//!
//! ```rust
//! use alert_core::{AlertType, CategoryCode};
//!
//! let code = CategoryCode::from("1");
//! assert_eq!(AlertType::from_code(code.numeric()), AlertType::Missiles);
//! assert_eq!(AlertType::from_code(999).as_str(), "unknown");
//! ```

mod alert;
mod category;
mod filter;
mod time;

pub use alert::Alert;
pub use category::{AlertType, CategoryCode, NEUTRAL_CATEGORY};
pub use filter::{filter_test_cities, DEFAULT_TEST_MARKER};
pub use time::{normalize_timestamp, now_timestamp, TIMESTAMP_FORMAT, UPSTREAM_TZ};
