//! Session-backed auth store

use couponbook::ports::{AuthStore, CurrentUser};

use crate::config::SessionConfig;

/// Read-only view of the configured session.
#[derive(Debug, Clone, Default)]
pub struct SessionAuthStore {
    access_token: Option<String>,
    user: Option<CurrentUser>,
}

impl SessionAuthStore {
    /// Build from session settings. A user is only known when an id is set.
    pub fn from_config(config: &SessionConfig) -> Self {
        let user = config.user_id.as_ref().map(|id| CurrentUser {
            id: id.clone(),
            email: config.user_email.clone(),
            premium: config.user_premium,
        });

        Self {
            access_token: config
                .access_token
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_owned),
            user,
        }
    }

    /// Bearer token for API requests, if signed in.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl AuthStore for SessionAuthStore {
    fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    fn current_user(&self) -> Option<CurrentUser> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: Option<&str>, user_id: Option<&str>, premium: bool) -> SessionConfig {
        SessionConfig {
            access_token: token.map(str::to_owned),
            user_id: user_id.map(str::to_owned),
            user_email: Some("ana@example.test".to_owned()),
            user_premium: premium,
        }
    }

    #[test]
    fn blank_token_counts_as_signed_out() {
        let store = SessionAuthStore::from_config(&session(Some("  "), None, false));

        assert!(!store.has_access_token(), "blank token ignored");
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn user_requires_an_id() {
        let anonymous = SessionAuthStore::from_config(&session(Some("t"), None, true));
        let member = SessionAuthStore::from_config(&session(Some("t"), Some("u1"), true));

        assert_eq!(anonymous.current_user(), None);
        assert_eq!(
            member.current_user(),
            Some(CurrentUser {
                id: "u1".to_owned(),
                email: Some("ana@example.test".to_owned()),
                premium: true,
            })
        );
    }
}
