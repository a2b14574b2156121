use std::fmt;
use std::sync::Arc;

use mock_identity::{Authentication, Authorities, roles_to_authorities, to_authorities};

use crate::errors::AssertionError;
use crate::server::MvcResult;

/// Assertion over a performed request
pub trait ResultMatcher {
    fn matches(&self, result: &MvcResult) -> Result<(), AssertionError>;
}

impl<F> ResultMatcher for F
where
    F: Fn(&MvcResult) -> Result<(), AssertionError>,
{
    fn matches(&self, result: &MvcResult) -> Result<(), AssertionError> {
        self(result)
    }
}

/// No authentication captured, or one that is not flagged authenticated
pub fn unauthenticated() -> Unauthenticated {
    Unauthenticated
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Unauthenticated;

impl ResultMatcher for Unauthenticated {
    fn matches(&self, result: &MvcResult) -> Result<(), AssertionError> {
        match result.security_context().authentication() {
            Some(auth) if auth.is_authenticated() => Err(AssertionError::UnexpectedlyAuthenticated {
                username: auth.name().to_string(),
            }),
            _ => Ok(()),
        }
    }
}

pub fn authenticated() -> Authenticated {
    Authenticated::default()
}

type Predicate = Arc<dyn Fn(&Authentication) -> bool + Send + Sync>;

/// An authenticated identity, optionally refined
///
/// Role and authority expectations compare the whole authority set; a
/// subset or superset does not match. Expecting both roles and authorities
/// is an invalid expectation.
#[derive(Default)]
pub struct Authenticated {
    username: Option<String>,
    roles: Option<Vec<String>>,
    authorities: Option<Vec<String>>,
    predicates: Vec<(String, Predicate)>,
}

impl Authenticated {
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Roles are prefixed before comparing
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities = Some(authorities.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_authentication(
        mut self,
        description: impl Into<String>,
        predicate: impl Fn(&Authentication) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates
            .push((description.into(), Arc::new(predicate)));
        self
    }

    fn expected_authorities(&self) -> Result<Option<Authorities>, AssertionError> {
        match (&self.roles, &self.authorities) {
            (None, None) => Ok(None),
            (Some(roles), None) => roles_to_authorities(roles)
                .map(Some)
                .map_err(|e| AssertionError::InvalidExpectation(e.to_string())),
            (None, Some(authorities)) => Ok(Some(to_authorities(authorities))),
            (Some(_), Some(_)) => Err(AssertionError::InvalidExpectation(
                "roles and authorities cannot both be expected".to_string(),
            )),
        }
    }
}

fn names(authorities: &Authorities) -> Vec<String> {
    authorities.iter().map(|a| a.as_str().to_string()).collect()
}

impl ResultMatcher for Authenticated {
    fn matches(&self, result: &MvcResult) -> Result<(), AssertionError> {
        let auth = match result.security_context().authentication() {
            Some(auth) if auth.is_authenticated() => auth,
            Some(auth) => {
                return Err(AssertionError::NotAuthenticated {
                    found: format!("unauthenticated {}", auth.name()),
                });
            }
            None => {
                return Err(AssertionError::NotAuthenticated {
                    found: "no authentication".to_string(),
                });
            }
        };

        if let Some(expected) = &self.username {
            if auth.name() != expected {
                return Err(AssertionError::UsernameMismatch {
                    expected: expected.clone(),
                    actual: auth.name().to_string(),
                });
            }
        }

        if let Some(expected) = self.expected_authorities()? {
            if &expected != auth.authorities() {
                return Err(AssertionError::AuthoritiesMismatch {
                    expected: names(&expected),
                    actual: names(auth.authorities()),
                });
            }
        }

        for (description, predicate) in &self.predicates {
            if !predicate(auth) {
                return Err(AssertionError::Predicate(description.clone()));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Authenticated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptions: Vec<&str> = self.predicates.iter().map(|(d, _)| d.as_str()).collect();
        f.debug_struct("Authenticated")
            .field("username", &self.username)
            .field("roles", &self.roles)
            .field("authorities", &self.authorities)
            .field("predicates", &descriptions)
            .finish()
    }
}
