use serde::Deserialize;

use connectcargo_accounts::Account;
use connectcargo_profiles::Profile;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// "company" or "carrier".
    pub account_type: String,
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckEmailParams {
    pub email: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn account_to_json(account: &Account) -> serde_json::Value {
    serde_json::json!({
        "account_id": account.account_id().to_string(),
        "email": account.email().as_str(),
        "role": account.role().as_str(),
        "status": account.status().as_str(),
        "email_verified": account.is_email_verified(),
        "last_login": account.last_login().map(|t| t.to_rfc3339()),
    })
}

pub fn profile_to_json(profile: &Profile) -> serde_json::Value {
    match profile {
        Profile::Company(company) => serde_json::json!({
            "kind": "company",
            "profile_id": profile.profile_id().to_string(),
            "legal_name": company.legal_name(),
            "commercial_name": company.commercial_name(),
            "company_type": format!("{:?}", company.company_type()).to_lowercase(),
            "completed_shipments": company.completed_shipments(),
            "average_rating": company.average_rating(),
        }),
        Profile::Carrier(carrier) => serde_json::json!({
            "kind": "carrier",
            "profile_id": profile.profile_id().to_string(),
            "carrier_type": format!("{:?}", carrier.carrier_type()).to_lowercase(),
            "driver_license": carrier.driver_license(),
            "document_status": format!("{:?}", carrier.document_status()).to_lowercase(),
            "completed_trips": carrier.completed_trips(),
            "average_rating": carrier.average_rating(),
        }),
    }
}
