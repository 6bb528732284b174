//! Caller identity. Token verification itself is external; this module only
//! defines the seam and a static token table for local use.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

pub trait Authenticator: Send + Sync {
    /// Resolve the `Authorization` header value to an identity; `None` when
    /// the header is missing or the credential is not accepted.
    fn authenticate(&self, authorization: Option<&str>) -> Option<Identity>;
}

/// Accepts a fixed set of bearer tokens, each bound to one email.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, String>,
}

impl StaticTokenAuthenticator {
    #[must_use]
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, email: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), email.into());
        self
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, authorization: Option<&str>) -> Option<Identity> {
        let raw = authorization?.trim();
        let token = raw.strip_prefix("Bearer ").map_or(raw, str::trim);
        if token.is_empty() {
            return None;
        }
        let email = self.tokens.get(token);
        if email.is_none() {
            log::debug!("rejected bearer token");
        }
        email.map(Identity::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_bearer_and_bare_tokens() {
        let a = StaticTokenAuthenticator::default().with_token("t1", "reviewer@aloi.it");
        assert_eq!(a.authenticate(Some("Bearer t1")), Some(Identity::new("reviewer@aloi.it")));
        assert_eq!(a.authenticate(Some("t1")), Some(Identity::new("reviewer@aloi.it")));
        assert_eq!(a.authenticate(Some("Bearer nope")), None);
        assert_eq!(a.authenticate(Some("Bearer ")), None);
        assert_eq!(a.authenticate(None), None);
    }
}
