//! Idempotent startup routine ensuring the well-known admin and staff
//! accounts exist. Ordinary initialization — deliberately outside the
//! lifecycle managers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use tracing::{info, warn};

use crate::config::AuthConfig;

use super::domain::{NewUser, Role};
use super::repository::{TokenRepository, UserRepository};
use super::service::{AuthError, UserService};

pub fn ensure_admin<U, T>(
    service: &UserService<U, T>,
    config: &AuthConfig,
) -> Result<(), AuthError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    ensure_account(
        service,
        Role::Admin,
        "admin",
        &config.admin_email,
        config.admin_password.as_deref(),
    )
}

pub fn ensure_staff<U, T>(
    service: &UserService<U, T>,
    config: &AuthConfig,
) -> Result<(), AuthError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    ensure_account(
        service,
        Role::Staff,
        "staff",
        &config.staff_email,
        config.staff_password.as_deref(),
    )
}

fn ensure_account<U, T>(
    service: &UserService<U, T>,
    role: Role,
    username: &str,
    email: &str,
    password: Option<&str>,
) -> Result<(), AuthError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match service.get_user_by_email(email) {
        Ok(_) => {
            info!(%email, "existing {username} account found");
            return Ok(());
        }
        Err(AuthError::NotFound { .. }) => {}
        Err(err) => return Err(err),
    }

    let password = match password {
        Some(password) => password.to_string(),
        None => {
            let generated = random_password();
            warn!(%email, "generated random {username} password: {generated}");
            generated
        }
    };

    service.create_user(
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            role,
        },
        &password,
    )?;

    info!(%email, "new {username} account created");
    Ok(())
}

fn random_password() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}
