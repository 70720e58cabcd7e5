use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::DashError;
use crate::settings::validate_email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub organization_id: String,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// The signed in user, if any. There is no real authentication behind it:
/// any well formed email with a long enough password signs in as the demo
/// administrator. The password is checked for length only and never kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, DashError> {
        let email = email.trim();
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DashError::ShortPassword);
        }
        info!("Signing in {email}");
        Ok(self.user.insert(User {
            id: "1".to_string(),
            name: "Demo User".to_string(),
            email: email.to_string(),
            role: UserRole::Admin,
            avatar_url: None,
            organization_id: "org-1".to_string(),
        }))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Signed out {}", user.email);
        }
    }

    pub fn update_profile(&mut self, name: &str) -> Result<&User, DashError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashError::InvalidName);
        }
        let user = self.user.as_mut().ok_or(DashError::NotSignedIn)?;
        user.name = name.to_string();
        Ok(user)
    }
}
