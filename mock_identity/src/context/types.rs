use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::authority::{Authorities, GrantedAuthority};
use crate::lookup::UserDetails;

/// Identity object carried by an authentication record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Principal {
    User(UserDetails),
    Anonymous(String),
    Custom {
        name: String,
        #[serde(default)]
        attributes: BTreeMap<String, serde_json::Value>,
    },
}

impl Principal {
    pub fn name(&self) -> &str {
        match self {
            Principal::User(user) => &user.username,
            Principal::Anonymous(name) => name,
            Principal::Custom { name, .. } => name,
        }
    }
}

/// How an authentication record came to be; informational only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationKind {
    UsernamePassword,
    Anonymous,
    Custom(String),
}

/// Principal, credentials and granted authorities of one identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    principal: Principal,
    credentials: Option<String>,
    authorities: Authorities,
    authenticated: bool,
    kind: AuthenticationKind,
}

impl Authentication {
    /// Authenticated username/password record for a user
    pub fn username_password(user: UserDetails) -> Self {
        let credentials = Some(user.password.clone());
        let authorities = user.authorities.clone();
        Self {
            principal: Principal::User(user),
            credentials,
            authorities,
            authenticated: true,
            kind: AuthenticationKind::UsernamePassword,
        }
    }

    /// Username/password record that has not been verified
    pub fn unauthenticated(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        let password = password.into();
        Self {
            principal: Principal::User(UserDetails {
                username,
                password: password.clone(),
                authorities: Authorities::new(),
                enabled: true,
            }),
            credentials: Some(password),
            authorities: Authorities::new(),
            authenticated: false,
            kind: AuthenticationKind::UsernamePassword,
        }
    }

    /// Anonymous record; never counts as authenticated
    pub fn anonymous(name: impl Into<String>, authorities: Authorities) -> Self {
        Self {
            principal: Principal::Anonymous(name.into()),
            credentials: None,
            authorities,
            authenticated: false,
            kind: AuthenticationKind::Anonymous,
        }
    }

    /// Fully specified record, typically built by custom factories
    pub fn new(
        principal: Principal,
        credentials: Option<String>,
        authorities: Authorities,
        authenticated: bool,
        kind: AuthenticationKind,
    ) -> Self {
        Self {
            principal,
            credentials,
            authorities,
            authenticated,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        self.principal.name()
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn credentials(&self) -> Option<&str> {
        self.credentials.as_deref()
    }

    pub fn authorities(&self) -> &Authorities {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(&GrantedAuthority::from(authority))
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn kind(&self) -> &AuthenticationKind {
        &self.kind
    }

    /// Explicit test-code mutation; the library never calls this
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }
}

/// Container holding at most one authentication record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_authentication(authentication: Authentication) -> Self {
        Self {
            authentication: Some(authentication),
        }
    }

    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn set_authentication(&mut self, authentication: Option<Authentication>) {
        self.authentication = authentication;
    }

    pub fn is_empty(&self) -> bool {
        self.authentication.is_none()
    }

    /// Present and flagged authenticated
    pub fn is_authenticated(&self) -> bool {
        self.authentication
            .as_ref()
            .is_some_and(Authentication::is_authenticated)
    }
}

impl From<Authentication> for SecurityContext {
    fn from(authentication: Authentication) -> Self {
        Self::with_authentication(authentication)
    }
}
