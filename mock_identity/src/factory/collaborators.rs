use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::lookup::UserDetailsService;

use super::errors::SetupError;

/// Externally supplied services that factories may depend on
#[derive(Clone, Default)]
pub struct Collaborators {
    default_service: Option<Arc<dyn UserDetailsService>>,
    named_services: HashMap<String, Arc<dyn UserDetailsService>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup collaborator used when a descriptor names none
    pub fn with_user_details_service(mut self, service: impl UserDetailsService + 'static) -> Self {
        self.default_service = Some(Arc::new(service));
        self
    }

    pub fn with_named_service(
        mut self,
        name: impl Into<String>,
        service: impl UserDetailsService + 'static,
    ) -> Self {
        self.named_services.insert(name.into(), Arc::new(service));
        self
    }

    pub fn user_details_service(
        &self,
        name: Option<&str>,
    ) -> Result<&dyn UserDetailsService, SetupError> {
        match name {
            Some(name) => self
                .named_services
                .get(name)
                .map(|s| s.as_ref())
                .ok_or_else(|| SetupError::UnknownLookupService(name.to_string())),
            None => self
                .default_service
                .as_deref()
                .ok_or(SetupError::NoLookupService),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.named_services.keys().collect();
        names.sort();
        f.debug_struct("Collaborators")
            .field("default_service", &self.default_service.is_some())
            .field("named_services", &names)
            .finish()
    }
}
