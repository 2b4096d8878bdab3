use std::fmt;

/// Bearer credential forwarded to the upstream platform services.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Identity of the caller, resolved from request headers and passed explicitly to
/// whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser {
    /// Platform user identifier, when the client sends one.
    pub user_id: Option<String>,
    /// Token to forward to upstream services.
    pub token: Option<AccessToken>,
}

impl CurrentUser {
    /// Caller without any identity.
    pub fn anonymous() -> Self {
        Self::default()
    }
}
