use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::config::MOCK_IDENTITY_ROLE_PREFIX;
use crate::descriptor::DescriptorError;

/// A permission or role string granted to a principal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    pub fn new(authority: impl Into<String>) -> Self {
        Self(authority.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrantedAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GrantedAuthority {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GrantedAuthority {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Authority set as stored on an authentication record
pub type Authorities = BTreeSet<GrantedAuthority>;

/// Convert role names into authorities using the configured role prefix
pub fn roles_to_authorities<I, S>(roles: I) -> Result<Authorities, DescriptorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    roles_to_authorities_with_prefix(roles, MOCK_IDENTITY_ROLE_PREFIX.as_str())
}

/// Convert role names into authorities, prefixing each one with `prefix`
///
/// A role that already carries the prefix is rejected: the prefix is always
/// added here, so `ROLE_USER` given as a role is almost certainly a mistake.
pub fn roles_to_authorities_with_prefix<I, S>(
    roles: I,
    prefix: &str,
) -> Result<Authorities, DescriptorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    roles
        .into_iter()
        .map(|role| {
            let role = role.as_ref();
            if role.is_empty() {
                return Err(DescriptorError::EmptyRole);
            }
            if !prefix.is_empty() && role.starts_with(prefix) {
                return Err(DescriptorError::RoleAlreadyPrefixed {
                    role: role.to_string(),
                    prefix: prefix.to_string(),
                });
            }
            Ok(GrantedAuthority(format!("{prefix}{role}")))
        })
        .collect()
}

/// Convert authority strings verbatim, without any prefixing
pub fn to_authorities<I, S>(authorities: I) -> Authorities
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    authorities
        .into_iter()
        .map(|a| GrantedAuthority::new(a.as_ref()))
        .collect()
}
