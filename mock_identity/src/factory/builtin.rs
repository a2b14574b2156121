use crate::authority::roles_to_authorities;
use crate::config::{ANONYMOUS_PRINCIPAL, ANONYMOUS_ROLE};
use crate::context::{Authentication, SecurityContext};
use crate::descriptor::{WithAnonymousUser, WithMockUser, WithUserDetails};
use crate::lookup::UserDetails;

use super::collaborators::Collaborators;
use super::errors::SetupError;
use super::registry::SecurityContextFactory;

/// Builds the context purely from the descriptor's literal fields
#[derive(Debug, Clone, Copy, Default)]
pub struct MockUserFactory;

impl MockUserFactory {
    /// Same construction as the factory, for callers outside the injector
    pub fn authentication_for(descriptor: &WithMockUser) -> Result<Authentication, SetupError> {
        let authorities = descriptor.granted_authorities()?;
        let principal = UserDetails {
            username: descriptor.get_username().to_string(),
            password: descriptor.get_password().to_string(),
            authorities,
            enabled: true,
        };
        Ok(Authentication::username_password(principal))
    }
}

impl SecurityContextFactory<WithMockUser> for MockUserFactory {
    fn create_security_context(
        &self,
        descriptor: &WithMockUser,
        _services: &Collaborators,
    ) -> Result<SecurityContext, SetupError> {
        Self::authentication_for(descriptor).map(SecurityContext::with_authentication)
    }
}

/// Delegates to the lookup collaborator keyed by username
#[derive(Debug, Clone, Copy, Default)]
pub struct UserDetailsFactory;

impl SecurityContextFactory<WithUserDetails> for UserDetailsFactory {
    fn create_security_context(
        &self,
        descriptor: &WithUserDetails,
        services: &Collaborators,
    ) -> Result<SecurityContext, SetupError> {
        let service = services.user_details_service(descriptor.get_service())?;
        let user = service
            .load_user_by_username(descriptor.get_username())
            .inspect_err(|e| {
                tracing::error!(
                    "Failed to load user {} for test setup: {}",
                    descriptor.get_username(),
                    e
                );
            })?;
        Ok(SecurityContext::with_authentication(
            Authentication::username_password(user),
        ))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousFactory;

impl SecurityContextFactory<WithAnonymousUser> for AnonymousFactory {
    fn create_security_context(
        &self,
        _descriptor: &WithAnonymousUser,
        _services: &Collaborators,
    ) -> Result<SecurityContext, SetupError> {
        let authorities = roles_to_authorities([ANONYMOUS_ROLE])?;
        Ok(SecurityContext::with_authentication(
            Authentication::anonymous(ANONYMOUS_PRINCIPAL, authorities),
        ))
    }
}
