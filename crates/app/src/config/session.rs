//! Session Config

use clap::Args;

/// Signed-in user, as far as this host knows it.
#[derive(Debug, Clone, Args)]
pub struct SessionConfig {
    /// Bearer token sent with API requests
    #[arg(long, env = "COUPONBOOK_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Signed-in user id
    #[arg(long, env = "COUPONBOOK_USER_ID")]
    pub user_id: Option<String>,

    /// Signed-in user email
    #[arg(long, env = "COUPONBOOK_USER_EMAIL")]
    pub user_email: Option<String>,

    /// Whether the signed-in user has a premium membership
    #[arg(long, env = "COUPONBOOK_USER_PREMIUM", default_value_t = false)]
    pub user_premium: bool,
}
