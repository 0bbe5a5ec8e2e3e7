//! API Config

use clap::Args;
use reqwest::Url;

/// Remote GraphQL API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// GraphQL endpoint
    #[arg(
        long,
        env = "COUPONBOOK_API_URL",
        default_value = "http://localhost:4000/graphql"
    )]
    pub api_url: Url,

    /// Request timeout in seconds
    #[arg(long, env = "COUPONBOOK_TIMEOUT_SECONDS", default_value_t = 10u64)]
    pub timeout_seconds: u64,
}
