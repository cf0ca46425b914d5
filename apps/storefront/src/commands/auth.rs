//! # Auth Commands
//!
//! Login page, header account menu and profile page.

use jewelar_core::{ProfileUpdate, User};
use jewelar_store::AuthStore;
use tracing::debug;

use crate::error::ApiResult;

pub fn login(auth: &AuthStore, email: &str, password: &str) -> ApiResult<User> {
    debug!("login command");
    Ok(auth.login(email, password)?)
}

pub fn logout(auth: &AuthStore) {
    debug!("logout command");
    auth.logout();
}

pub fn get_current_user(auth: &AuthStore) -> Option<User> {
    auth.current_user()
}

pub fn update_profile(auth: &AuthStore, update: ProfileUpdate) -> ApiResult<User> {
    debug!("update_profile command");
    Ok(auth.update_profile(update)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jewelar_store::StorefrontConfig;

    fn store() -> AuthStore {
        AuthStore::from_config(&StorefrontConfig::default().auth.users).unwrap()
    }

    #[test]
    fn test_demo_login_and_profile() {
        let auth = store();
        assert!(get_current_user(&auth).is_none());

        let user = login(&auth, "demo@jewelar.com", "tryon-demo").unwrap();
        assert_eq!(user.full_name, "Demo Shopper");

        let updated = update_profile(
            &auth,
            ProfileUpdate {
                full_name: "Demo Shopper".to_string(),
                phone: "+91 90000 00000".to_string(),
                address: "Hill Road, Bandra West, Mumbai".to_string(),
            },
        )
        .unwrap();
        assert_eq!(updated.phone, "+91 90000 00000");

        logout(&auth);
        assert!(get_current_user(&auth).is_none());
    }

    #[test]
    fn test_failures_carry_codes() {
        let auth = store();

        let err = login(&auth, "demo@jewelar.com", "wrong").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(err.message, "Invalid email or password. Please try again.");

        let err = update_profile(
            &auth,
            ProfileUpdate {
                full_name: "Nobody".to_string(),
                phone: String::new(),
                address: String::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }
}
