use std::fmt;

/// Credential issued by the login endpoint. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Login state passed explicitly to every request-issuing call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<BearerToken>,
    user_name: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: BearerToken, user_name: Option<String>) -> Self {
        Self {
            token: Some(token),
            user_name,
        }
    }

    /// Convenience for callers holding a raw token string, e.g. from the
    /// environment. Blank strings yield an anonymous session.
    pub fn from_raw_token(token: Option<&str>) -> Self {
        Self {
            token: token.and_then(BearerToken::new),
            user_name: None,
        }
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user_name = None;
    }
}
