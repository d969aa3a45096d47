//! Listing service, object storage uploads, and client workflows for the
//! Kalyani Estate marketplace.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod listings;
pub mod storage;
pub mod telemetry;
