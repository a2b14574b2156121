//! mock_identity - declarative test identities and per-test security context injection
//!
//! A test declares who it runs as with a [`Descriptor`]. The [`ContextInjector`]
//! resolves the effective descriptor (method level over class level), builds a
//! [`SecurityContext`] through the [`FactoryRegistry`] and installs it in the
//! per-thread [`SecurityContextHolder`] for the duration of the test.
//!
//! ```
//! use mock_identity::{
//!     ContextInjector, SecurityContextHolder, TestDeclaration, WithMockUser,
//! };
//!
//! let mut injector = ContextInjector::default();
//! let test = TestDeclaration::new("admin_can_delete")
//!     .method_level(WithMockUser::new().username("admin").roles(["ADMIN"]));
//!
//! let name = injector
//!     .run_test(&test, || {}, || {
//!         SecurityContextHolder::get()
//!             .authentication()
//!             .map(|a| a.name().to_string())
//!     })
//!     .unwrap();
//! assert_eq!(name.as_deref(), Some("admin"));
//! assert!(!SecurityContextHolder::is_installed());
//! ```

mod authority;
mod config;
mod context;
mod descriptor;
mod factory;
mod injector;
mod lookup;

#[cfg(test)]
mod test_utils;

pub use authority::{
    Authorities, GrantedAuthority, roles_to_authorities, roles_to_authorities_with_prefix,
    to_authorities,
};

pub use config::{
    ANONYMOUS_PRINCIPAL, ANONYMOUS_ROLE, MOCK_IDENTITY_DEFAULT_PASSWORD,
    MOCK_IDENTITY_DEFAULT_USERNAME, MOCK_IDENTITY_ROLE_PREFIX,
};

pub use context::{
    Authentication, AuthenticationKind, HolderGuard, Principal, SecurityContext,
    SecurityContextHolder,
};

pub use descriptor::{
    CustomDescriptor, Descriptor, DescriptorError, DescriptorKind, SetupPhase, WithAnonymousUser,
    WithMockUser, WithUserDetails,
};

pub use factory::{
    AnonymousFactory, Collaborators, FactoryRegistry, MockUserFactory, SecurityContextFactory,
    SetupError, UserDetailsFactory,
};

pub use injector::{ContextInjector, InjectorState, TestDeclaration, TestSuite};

pub use lookup::{
    InMemoryUserDetailsService, LookupError, UserDetails, UserDetailsBuilder, UserDetailsService,
};
