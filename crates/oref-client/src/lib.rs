//! Client for the Home Front Command (Pikud Haoref) alert feeds.
//!
//! This crate fetches the two upstream resources the relay consumes:
//!
//! - The "current alert" document, polled every couple of seconds
//! - The flat per-city alert history, used to backfill storage
//!
//! # Example
//!
//! ```no_run
//! use oref_client::{OrefClient, OrefConfig};
//!
//! # async fn example() -> Result<(), oref_client::OrefError> {
//! let client = OrefClient::new(OrefConfig::default())?;
//!
//! if let Some(alert) = client.fetch_current().await? {
//!     println!("{}: {:?}", alert.title, alert.data);
//! }
//!
//! let history = client.fetch_history().await?;
//! println!("{} history rows", history.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use client::OrefClient;
pub use config::OrefConfig;
pub use error::OrefError;
pub use source::AlertSource;
pub use types::{CurrentAlert, HistoryEntry};
