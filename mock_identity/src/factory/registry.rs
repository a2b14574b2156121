use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::SecurityContext;
use crate::descriptor::{CustomDescriptor, Descriptor};

use super::builtin::{AnonymousFactory, MockUserFactory, UserDetailsFactory};
use super::collaborators::Collaborators;
use super::errors::SetupError;

/// Turns a descriptor of type `D` into a security context
pub trait SecurityContextFactory<D>: Send + Sync {
    fn create_security_context(
        &self,
        descriptor: &D,
        services: &Collaborators,
    ) -> Result<SecurityContext, SetupError>;
}

impl<D, F> SecurityContextFactory<D> for F
where
    F: Fn(&D, &Collaborators) -> Result<SecurityContext, SetupError> + Send + Sync,
{
    fn create_security_context(
        &self,
        descriptor: &D,
        services: &Collaborators,
    ) -> Result<SecurityContext, SetupError> {
        self(descriptor, services)
    }
}

trait ErasedFactory: Send + Sync {
    fn create(
        &self,
        descriptor: &CustomDescriptor,
        services: &Collaborators,
    ) -> Result<SecurityContext, SetupError>;
}

struct TypedFactory<D, F> {
    factory: F,
    _descriptor: PhantomData<fn(&D)>,
}

impl<D, F> ErasedFactory for TypedFactory<D, F>
where
    D: Any + Send + Sync,
    F: SecurityContextFactory<D>,
{
    fn create(
        &self,
        descriptor: &CustomDescriptor,
        services: &Collaborators,
    ) -> Result<SecurityContext, SetupError> {
        let typed = descriptor.downcast_ref::<D>().ok_or_else(|| {
            SetupError::Factory(format!(
                "Descriptor {} does not match factory type {}",
                descriptor.type_name(),
                std::any::type_name::<D>()
            ))
        })?;
        self.factory.create_security_context(typed, services)
    }
}

/// Maps descriptor kinds to the factory that builds their context
///
/// The built-in kinds are always present; custom descriptor types are
/// resolved by their Rust type through explicit registration.
#[derive(Clone)]
pub struct FactoryRegistry {
    custom: HashMap<TypeId, Arc<dyn ErasedFactory>>,
    names: HashMap<TypeId, &'static str>,
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self {
            custom: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Register the factory for custom descriptors of type `D`, replacing any
    /// earlier registration for the same type
    pub fn register<D, F>(&mut self, factory: F) -> &mut Self
    where
        D: Any + Send + Sync,
        F: SecurityContextFactory<D> + 'static,
    {
        let type_id = TypeId::of::<D>();
        if self.names.insert(type_id, std::any::type_name::<D>()).is_some() {
            tracing::warn!(
                "Replacing security context factory for {}",
                std::any::type_name::<D>()
            );
        }
        self.custom.insert(
            type_id,
            Arc::new(TypedFactory {
                factory,
                _descriptor: PhantomData::<fn(&D)>,
            }),
        );
        self
    }

    /// Builder form of [`FactoryRegistry::register`]
    pub fn with_factory<D, F>(mut self, factory: F) -> Self
    where
        D: Any + Send + Sync,
        F: SecurityContextFactory<D> + 'static,
    {
        self.register::<D, F>(factory);
        self
    }

    pub fn is_registered<D: Any>(&self) -> bool {
        self.custom.contains_key(&TypeId::of::<D>())
    }

    /// Dispatch a descriptor to the factory for its kind
    pub fn create(
        &self,
        descriptor: &Descriptor,
        services: &Collaborators,
    ) -> Result<SecurityContext, SetupError> {
        match descriptor {
            Descriptor::Mock(d) => MockUserFactory.create_security_context(d, services),
            Descriptor::Lookup(d) => UserDetailsFactory.create_security_context(d, services),
            Descriptor::Anonymous(d) => AnonymousFactory.create_security_context(d, services),
            Descriptor::Custom(d) => {
                let factory = self.custom.get(&d.descriptor_type()).ok_or_else(|| {
                    SetupError::NoFactoryRegistered {
                        descriptor_type: d.type_name().to_string(),
                    }
                })?;
                factory.create(d, services)
            }
        }
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names.values().copied().collect();
        names.sort_unstable();
        f.debug_struct("FactoryRegistry")
            .field("custom", &names)
            .finish()
    }
}
