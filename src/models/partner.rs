//! Partner application models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /api/partner`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Erika Mustermann",
///   "company": "Muster Digital GmbH",
///   "email": "erika@muster.de",
///   "phone": "+49 30 1234567",
///   "website": "https://muster.de"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PartnerRequest {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub company: String,

    #[validate(email)]
    pub email: String,

    pub phone: String,

    pub website: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartnerResponse {
    pub success: bool,
    pub message: String,
}

impl PartnerResponse {
    pub fn received() -> Self {
        Self {
            success: true,
            message: "Partner application received".to_string(),
        }
    }
}
