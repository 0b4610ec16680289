use serde::Serialize;

use crate::cache::key::derive_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    App,
    User,
}

impl TokenKind {
    /// Cache key namespace
    pub fn namespace(&self) -> &'static str {
        match self {
            TokenKind::App => "APP",
            TokenKind::User => "USER",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::App => "app",
            TokenKind::User => "user",
        }
    }
}

/// A token to acquire: for the calling service itself, or on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRequest {
    App {
        service_name: String,
        service_secret: String,
    },
    User {
        service_name: String,
        service_secret: String,
        user_id: String,
    },
}

/// JSON body sent to the issuer
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IssueBody<'a> {
    pub name: &'a str,
    pub secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<&'a str>,
}

impl TokenRequest {
    pub fn app(service_name: impl Into<String>, service_secret: impl Into<String>) -> Self {
        TokenRequest::App {
            service_name: service_name.into(),
            service_secret: service_secret.into(),
        }
    }

    pub fn user(
        service_name: impl Into<String>,
        service_secret: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        TokenRequest::User {
            service_name: service_name.into(),
            service_secret: service_secret.into(),
            user_id: user_id.into(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            TokenRequest::App { .. } => TokenKind::App,
            TokenRequest::User { .. } => TokenKind::User,
        }
    }

    pub fn service_name(&self) -> &str {
        match self {
            TokenRequest::App { service_name, .. } | TokenRequest::User { service_name, .. } => service_name,
        }
    }

    /// Identity material the cache key is derived from:
    /// the service secret for app tokens, the user id for user tokens.
    pub fn key_material(&self) -> &str {
        match self {
            TokenRequest::App { service_secret, .. } => service_secret,
            TokenRequest::User { user_id, .. } => user_id,
        }
    }

    pub fn cache_key(&self) -> String {
        derive_key(self.kind().namespace(), self.key_material())
    }

    pub fn body(&self) -> IssueBody<'_> {
        match self {
            TokenRequest::App { service_name, service_secret } => IssueBody {
                name: service_name,
                secret: service_secret,
                uid: None,
            },
            TokenRequest::User { service_name, service_secret, user_id } => IssueBody {
                name: service_name,
                secret: service_secret,
                uid: Some(user_id.as_str()),
            },
        }
    }
}
