mod config;
mod extract;
mod filter;
mod mvc;
mod session;

pub use config::SecurityConfig;
pub use extract::{AuthenticatedUser, CurrentContext, Unauthorized};
pub use mvc::{MockMvc, MockMvcBuilder, MvcResult};
