mod declaration;
mod lifecycle;

pub use declaration::{TestDeclaration, TestSuite};
pub use lifecycle::{ContextInjector, InjectorState};
