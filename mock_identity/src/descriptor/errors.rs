use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Roles and authorities are mutually exclusive on one descriptor
    #[error("Both roles and authorities are set; use exactly one of them")]
    RolesAndAuthorities,

    #[error("Role {role} must not start with {prefix} (it is added automatically)")]
    RoleAlreadyPrefixed { role: String, prefix: String },

    #[error("Role name must not be empty")]
    EmptyRole,

    #[error("Username must not be empty")]
    EmptyUsername,
}
