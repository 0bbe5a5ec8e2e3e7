//! Couponbook host
//!
//! Production collaborators for the redemption pipeline: configuration, the
//! GraphQL API client, the session-backed auth store and logging.

pub mod auth;
pub mod config;
pub mod context;
pub mod devices;
pub mod graphql;
pub mod notifications;
pub mod observability;
