/// Authenticated user domain type
use super::CatalogImage;
use serde::{Deserialize, Serialize};

/// Identity of the signed-in user, as returned by the provider's profile
/// endpoint and persisted under the `User` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// `null` for accounts that never set one
    #[serde(default)]
    pub display_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    pub id: String,
    #[serde(default)]
    pub country: String,
}

impl AuthenticatedUser {
    /// Name to show for the user, falling back to the email.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Same person as `other`. Identity is compared on email only.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.email == other.email
    }
}
