mod holder;
mod types;

pub use holder::{HolderGuard, SecurityContextHolder};
pub use types::{Authentication, AuthenticationKind, Principal, SecurityContext};
