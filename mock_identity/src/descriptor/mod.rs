mod errors;
mod types;

pub use errors::DescriptorError;
pub use types::{
    CustomDescriptor, Descriptor, DescriptorKind, SetupPhase, WithAnonymousUser, WithMockUser,
    WithUserDetails,
};
