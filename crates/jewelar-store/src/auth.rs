//! # Auth Store
//!
//! Demo login against a small user directory loaded from config. There is no
//! server-side session; "logged in" means this store holds a current user.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(email, password)                                                 │
//! │     │  validate email shape, password present                          │
//! │     ▼                                                                   │
//! │  find account by email (case-insensitive)                               │
//! │     │  argon2 verify (lock NOT held)                                    │
//! │     ├── ok   ──► current = account  ──► AuthEvent::LoggedIn            │
//! │     └── fail ──► InvalidCredentials (same error for unknown email)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jewelar_core::types::{ProfileUpdate, User};
use jewelar_core::validation::{validate_email, validate_required};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DemoUserConfig;
use crate::error::{StoreError, StoreResult};

const EVENT_CAPACITY: usize = 16;

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against an argon2 PHC string. Malformed hashes never
/// verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Clone)]
struct Account {
    user: User,
    password_hash: String,
}

impl Account {
    fn from_config(config: &DemoUserConfig) -> StoreResult<Self> {
        validate_email(&config.email)?;

        let password_hash = match (&config.password_hash, &config.password) {
            (Some(hash), _) => {
                PasswordHash::new(hash).map_err(|e| {
                    StoreError::InvalidConfig(format!(
                        "password_hash for {} is not a PHC string: {}",
                        config.email, e
                    ))
                })?;
                hash.clone()
            }
            (None, Some(password)) => hash_password(password)?,
            (None, None) => {
                return Err(StoreError::InvalidConfig(format!(
                    "demo user {} needs password or password_hash",
                    config.email
                )))
            }
        };

        Ok(Account {
            user: User {
                id: config
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                email: config.email.trim().to_string(),
                full_name: config.full_name.clone(),
                phone: config.phone.clone(),
                address: config.address.clone(),
            },
            password_hash,
        })
    }
}

/// Auth change notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthEvent {
    #[serde(rename_all = "camelCase")]
    LoggedIn { user_id: String },
    LoggedOut,
    #[serde(rename_all = "camelCase")]
    ProfileUpdated { user_id: String },
}

struct AuthState {
    accounts: Vec<Account>,
    current: Option<usize>,
}

// =============================================================================
// Auth Store
// =============================================================================

/// Login state.
pub struct AuthStore {
    state: Arc<Mutex<AuthState>>,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthStore {
    /// Builds the user directory. Plain-text demo passwords are hashed here.
    pub fn from_config(users: &[DemoUserConfig]) -> StoreResult<Self> {
        let accounts = users
            .iter()
            .map(Account::from_config)
            .collect::<StoreResult<Vec<_>>>()?;
        debug!(users = accounts.len(), "Demo user directory loaded");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(AuthStore {
            state: Arc::new(Mutex::new(AuthState {
                accounts,
                current: None,
            })),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Logs in. Unknown email and wrong password fail the same way.
    pub fn login(&self, email: &str, password: &str) -> StoreResult<User> {
        validate_email(email)?;
        validate_required("password", password)?;
        let email = email.trim();

        let candidate = self.with_state(|s| {
            s.accounts
                .iter()
                .position(|a| a.user.email.eq_ignore_ascii_case(email))
                .map(|index| (index, s.accounts[index].password_hash.clone()))
        });

        let index = match candidate {
            Some((index, hash)) if verify_password(password, &hash) => index,
            _ => {
                warn!("Login failed");
                return Err(StoreError::InvalidCredentials);
            }
        };

        let user = self.with_state(|s| {
            s.current = Some(index);
            s.accounts[index].user.clone()
        });

        info!(user_id = %user.id, "User logged in");
        self.emit(AuthEvent::LoggedIn {
            user_id: user.id.clone(),
        });
        Ok(user)
    }

    pub fn logout(&self) {
        let was_logged_in = self.with_state(|s| s.current.take().is_some());
        if was_logged_in {
            info!("User logged out");
            self.emit(AuthEvent::LoggedOut);
        }
    }

    /// Edits name, phone and address of the logged-in user.
    pub fn update_profile(&self, update: ProfileUpdate) -> StoreResult<User> {
        validate_required("full name", &update.full_name)?;

        let user = self.with_state(|s| {
            let index = s.current?;
            let user = &mut s.accounts[index].user;
            user.full_name = update.full_name.trim().to_string();
            user.phone = update.phone.trim().to_string();
            user.address = update.address.trim().to_string();
            Some(user.clone())
        });

        let user = user.ok_or_else(|| StoreError::NotAuthenticated("update your profile".to_string()))?;
        info!(user_id = %user.id, "Profile updated");
        self.emit(AuthEvent::ProfileUpdated {
            user_id: user.id.clone(),
        });
        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.with_state(|s| s.current.map(|i| s.accounts[i].user.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.with_state(|s| s.current.is_some())
    }

    fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut AuthState) -> R,
    {
        let mut state = self.lock();
        f(&mut state)
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }
}
