use serde::{Deserialize, Serialize};

use crate::authority::{Authorities, roles_to_authorities, to_authorities};
use crate::descriptor::DescriptorError;

use super::errors::LookupError;

/// User record returned by a lookup collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub username: String,
    pub password: String,
    pub authorities: Authorities,
    pub enabled: bool,
}

impl UserDetails {
    pub fn builder(username: impl Into<String>) -> UserDetailsBuilder {
        UserDetailsBuilder {
            username: username.into(),
            password: String::new(),
            roles: None,
            authorities: None,
            enabled: true,
        }
    }
}

pub struct UserDetailsBuilder {
    username: String,
    password: String,
    roles: Option<Vec<String>>,
    authorities: Option<Vec<String>>,
    enabled: bool,
}

impl UserDetailsBuilder {
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities = Some(authorities.into_iter().map(Into::into).collect());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> Result<UserDetails, DescriptorError> {
        if self.username.is_empty() {
            return Err(DescriptorError::EmptyUsername);
        }
        let authorities = match (self.roles, self.authorities) {
            (Some(_), Some(_)) => return Err(DescriptorError::RolesAndAuthorities),
            (Some(roles), None) => roles_to_authorities(&roles)?,
            (None, Some(authorities)) => to_authorities(&authorities),
            (None, None) => Authorities::new(),
        };
        Ok(UserDetails {
            username: self.username,
            password: self.password,
            authorities,
            enabled: self.enabled,
        })
    }
}

/// Identity lookup collaborator keyed by username
pub trait UserDetailsService: Send + Sync {
    fn load_user_by_username(&self, username: &str) -> Result<UserDetails, LookupError>;
}

impl<F> UserDetailsService for F
where
    F: Fn(&str) -> Result<UserDetails, LookupError> + Send + Sync,
{
    fn load_user_by_username(&self, username: &str) -> Result<UserDetails, LookupError> {
        self(username)
    }
}
