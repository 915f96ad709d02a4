//! Client reputation scoring for freelance job postings.
//!
//! Markup is read by an extraction backend into [`types::signals::ClientSignals`],
//! weighted into a 0-100 score and placed in a tier. Remote pages go through
//! a session cache so each posting is retrieved once.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod fetch;
pub mod report;
pub mod score;
pub mod types;
