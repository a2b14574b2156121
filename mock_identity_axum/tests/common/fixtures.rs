use mock_identity::{InMemoryUserDetailsService, UserDetails};

pub struct TestUsers;

impl TestUsers {
    pub const PASSWORD: &'static str = "password";

    pub fn user() -> UserDetails {
        UserDetails::builder("user")
            .password(Self::PASSWORD)
            .roles(["USER"])
            .build()
            .expect("valid fixture user")
    }

    pub fn admin() -> UserDetails {
        UserDetails::builder("admin")
            .password("admin-password")
            .roles(["USER", "ADMIN"])
            .build()
            .expect("valid fixture admin")
    }

    pub fn disabled() -> UserDetails {
        UserDetails::builder("disabled")
            .password(Self::PASSWORD)
            .roles(["USER"])
            .enabled(false)
            .build()
            .expect("valid fixture user")
    }

    pub fn service() -> InMemoryUserDetailsService {
        [Self::user(), Self::admin(), Self::disabled()]
            .into_iter()
            .collect()
    }
}
