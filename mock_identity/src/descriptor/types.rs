use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::authority::{Authorities, roles_to_authorities, to_authorities};
use crate::config::{DEFAULT_ROLES, MOCK_IDENTITY_DEFAULT_PASSWORD, MOCK_IDENTITY_DEFAULT_USERNAME};

use super::errors::DescriptorError;

/// When the resolved context is installed relative to per-test setup hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupPhase {
    /// Install before any per-test setup hook runs
    #[default]
    TestMethod,
    /// Install after the setup hooks, right before the test body
    TestExecution,
}

/// Run as a synthesized user built purely from the descriptor fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithMockUser {
    username: String,
    password: String,
    roles: Option<Vec<String>>,
    authorities: Option<Vec<String>>,
    setup: SetupPhase,
}

impl Default for WithMockUser {
    fn default() -> Self {
        Self {
            username: MOCK_IDENTITY_DEFAULT_USERNAME.to_string(),
            password: MOCK_IDENTITY_DEFAULT_PASSWORD.to_string(),
            roles: None,
            authorities: None,
            setup: SetupPhase::default(),
        }
    }
}

impl WithMockUser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Roles are prefixed with the configured role prefix
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Authorities are used verbatim
    pub fn authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities = Some(authorities.into_iter().map(Into::into).collect());
        self
    }

    pub fn setup(mut self, setup: SetupPhase) -> Self {
        self.setup = setup;
        self
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_password(&self) -> &str {
        &self.password
    }

    pub fn setup_phase(&self) -> SetupPhase {
        self.setup
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.username.is_empty() {
            return Err(DescriptorError::EmptyUsername);
        }
        if self.roles.is_some() && self.authorities.is_some() {
            return Err(DescriptorError::RolesAndAuthorities);
        }
        Ok(())
    }

    /// Resolve the authority set this descriptor grants
    ///
    /// Explicit authorities are taken as-is, roles are prefixed, and when
    /// neither is given the default roles apply.
    pub fn granted_authorities(&self) -> Result<Authorities, DescriptorError> {
        self.validate()?;
        match (&self.roles, &self.authorities) {
            (None, Some(authorities)) => Ok(to_authorities(authorities)),
            (Some(roles), None) => roles_to_authorities(roles),
            (None, None) => roles_to_authorities(DEFAULT_ROLES),
            (Some(_), Some(_)) => Err(DescriptorError::RolesAndAuthorities),
        }
    }
}

/// Run as a user loaded from a lookup collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithUserDetails {
    username: String,
    service: Option<String>,
    setup: SetupPhase,
}

impl Default for WithUserDetails {
    fn default() -> Self {
        Self::new(MOCK_IDENTITY_DEFAULT_USERNAME.as_str())
    }
}

impl WithUserDetails {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            service: None,
            setup: SetupPhase::default(),
        }
    }

    /// Name of the lookup collaborator to use instead of the default one
    pub fn service(mut self, name: impl Into<String>) -> Self {
        self.service = Some(name.into());
        self
    }

    pub fn setup(mut self, setup: SetupPhase) -> Self {
        self.setup = setup;
        self
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn setup_phase(&self) -> SetupPhase {
        self.setup
    }
}

/// Run as the anonymous principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WithAnonymousUser {
    setup: SetupPhase,
}

impl WithAnonymousUser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(mut self, setup: SetupPhase) -> Self {
        self.setup = setup;
        self
    }

    pub fn setup_phase(&self) -> SetupPhase {
        self.setup
    }
}

/// Caller-defined descriptor, dispatched to a factory registered for its type
#[derive(Clone)]
pub struct CustomDescriptor {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
    setup: SetupPhase,
}

impl CustomDescriptor {
    pub fn new<D: Any + Send + Sync>(descriptor: D) -> Self {
        Self {
            value: Arc::new(descriptor),
            type_id: TypeId::of::<D>(),
            type_name: std::any::type_name::<D>(),
            setup: SetupPhase::default(),
        }
    }

    pub fn setup(mut self, setup: SetupPhase) -> Self {
        self.setup = setup;
        self
    }

    pub fn setup_phase(&self) -> SetupPhase {
        self.setup
    }

    pub fn descriptor_type(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<D: Any>(&self) -> Option<&D> {
        self.value.downcast_ref::<D>()
    }
}

impl fmt::Debug for CustomDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomDescriptor")
            .field("type_name", &self.type_name)
            .field("setup", &self.setup)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Mock,
    Lookup,
    Anonymous,
    Custom,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DescriptorKind::Mock => "mock",
            DescriptorKind::Lookup => "lookup",
            DescriptorKind::Anonymous => "anonymous",
            DescriptorKind::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// Declarative description of who a test runs as
#[derive(Debug, Clone)]
pub enum Descriptor {
    Mock(WithMockUser),
    Lookup(WithUserDetails),
    Anonymous(WithAnonymousUser),
    Custom(CustomDescriptor),
}

impl Descriptor {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Mock(_) => DescriptorKind::Mock,
            Descriptor::Lookup(_) => DescriptorKind::Lookup,
            Descriptor::Anonymous(_) => DescriptorKind::Anonymous,
            Descriptor::Custom(_) => DescriptorKind::Custom,
        }
    }

    pub fn setup_phase(&self) -> SetupPhase {
        match self {
            Descriptor::Mock(d) => d.setup_phase(),
            Descriptor::Lookup(d) => d.setup_phase(),
            Descriptor::Anonymous(d) => d.setup_phase(),
            Descriptor::Custom(d) => d.setup_phase(),
        }
    }

    /// Shorthand for a custom descriptor
    pub fn custom<D: Any + Send + Sync>(descriptor: D) -> Self {
        Descriptor::Custom(CustomDescriptor::new(descriptor))
    }
}

impl From<WithMockUser> for Descriptor {
    fn from(d: WithMockUser) -> Self {
        Descriptor::Mock(d)
    }
}

impl From<WithUserDetails> for Descriptor {
    fn from(d: WithUserDetails) -> Self {
        Descriptor::Lookup(d)
    }
}

impl From<WithAnonymousUser> for Descriptor {
    fn from(d: WithAnonymousUser) -> Self {
        Descriptor::Anonymous(d)
    }
}

impl From<CustomDescriptor> for Descriptor {
    fn from(d: CustomDescriptor) -> Self {
        Descriptor::Custom(d)
    }
}
