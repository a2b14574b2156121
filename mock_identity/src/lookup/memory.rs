use std::collections::HashMap;

use super::errors::LookupError;
use super::types::{UserDetails, UserDetailsService};

/// Lookup collaborator backed by a fixed map of users
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDetailsService {
    users: HashMap<String, UserDetails>,
}

impl InMemoryUserDetailsService {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory user details service");
        Self::default()
    }

    /// Add a user, replacing any previous user with the same name
    pub fn with_user(mut self, user: UserDetails) -> Self {
        self.users.insert(user.username.clone(), user);
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<UserDetails> for InMemoryUserDetailsService {
    fn from_iter<T: IntoIterator<Item = UserDetails>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), Self::with_user)
    }
}

impl UserDetailsService for InMemoryUserDetailsService {
    fn load_user_by_username(&self, username: &str) -> Result<UserDetails, LookupError> {
        self.users.get(username).cloned().ok_or_else(|| {
            tracing::debug!("No user named {} in memory store", username);
            LookupError::NotFound(username.to_string())
        })
    }
}
