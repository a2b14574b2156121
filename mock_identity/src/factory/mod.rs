mod builtin;
mod collaborators;
mod errors;
mod registry;

pub use builtin::{AnonymousFactory, MockUserFactory, UserDetailsFactory};
pub use collaborators::Collaborators;
pub use errors::SetupError;
pub use registry::{FactoryRegistry, SecurityContextFactory};
