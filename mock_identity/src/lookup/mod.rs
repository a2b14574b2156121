mod errors;
mod memory;
mod types;

pub use errors::LookupError;
pub use memory::InMemoryUserDetailsService;
pub use types::{UserDetails, UserDetailsBuilder, UserDetailsService};
