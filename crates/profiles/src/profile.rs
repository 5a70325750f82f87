//! Company and Carrier profiles.
//!
//! Exactly one profile exists per account, chosen by the account role at
//! registration and created in the same atomic unit (the store enforces
//! both). The variants are mutually exclusive specializations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use connectcargo_accounts::AccountRole;
use connectcargo_core::{AccountId, DomainError, Entity, ProfileId};

/// Legal nature of a shipper company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    Natural,
    Legal,
}

/// Size band used for marketplace filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Micro,
    Small,
    Medium,
    Large,
}

/// Whether the carrier operates alone or as a fleet company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierType {
    Individual,
    Company,
}

/// Review state of a carrier's uploaded documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

/// Shipper-side profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    id: ProfileId,
    account_id: AccountId,
    legal_name: String,
    commercial_name: Option<String>,
    company_type: CompanyType,
    company_size: Option<CompanySize>,
    completed_shipments: u32,
    average_rating: f32,
    registered_at: DateTime<Utc>,
}

impl CompanyProfile {
    pub fn legal_name(&self) -> &str {
        &self.legal_name
    }

    pub fn commercial_name(&self) -> Option<&str> {
        self.commercial_name.as_deref()
    }

    pub fn company_type(&self) -> CompanyType {
        self.company_type
    }

    pub fn company_size(&self) -> Option<CompanySize> {
        self.company_size
    }

    pub fn completed_shipments(&self) -> u32 {
        self.completed_shipments
    }

    pub fn average_rating(&self) -> f32 {
        self.average_rating
    }
}

/// Carrier-side profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierProfile {
    id: ProfileId,
    account_id: AccountId,
    carrier_type: CarrierType,
    driver_license: Option<String>,
    license_expiry: Option<NaiveDate>,
    years_experience: u32,
    max_capacity_kg: Option<f64>,
    document_status: DocumentStatus,
    completed_trips: u32,
    average_rating: f32,
    registered_at: DateTime<Utc>,
}

impl CarrierProfile {
    pub fn carrier_type(&self) -> CarrierType {
        self.carrier_type
    }

    pub fn driver_license(&self) -> Option<&str> {
        self.driver_license.as_deref()
    }

    pub fn license_expiry(&self) -> Option<NaiveDate> {
        self.license_expiry
    }

    pub fn years_experience(&self) -> u32 {
        self.years_experience
    }

    pub fn max_capacity_kg(&self) -> Option<f64> {
        self.max_capacity_kg
    }

    pub fn document_status(&self) -> DocumentStatus {
        self.document_status
    }

    pub fn completed_trips(&self) -> u32 {
        self.completed_trips
    }

    pub fn average_rating(&self) -> f32 {
        self.average_rating
    }
}

/// Raw registration attributes used to seed a profile.
///
/// The type overrides are optional; registration defaults are a Legal
/// company and an Individual carrier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAttributes {
    pub full_name: String,
    pub company_type: Option<CompanyType>,
    pub carrier_type: Option<CarrierType>,
}

impl ProfileAttributes {
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }
}

/// The role-specific profile bound to one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Company(CompanyProfile),
    Carrier(CarrierProfile),
}

impl Profile {
    /// Construct the profile variant matching `role`.
    ///
    /// Companies start with legal = commercial = submitted name (which must
    /// not be blank) and no reputation history. Carriers start as
    /// Individual with no licence on file and documents pending review.
    pub fn bind_new(
        account_id: AccountId,
        role: AccountRole,
        attrs: ProfileAttributes,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        match role {
            AccountRole::Company => {
                let name = attrs.full_name.trim().to_string();
                if name.is_empty() {
                    return Err(DomainError::validation("company name cannot be empty"));
                }
                Ok(Profile::Company(CompanyProfile {
                    id: ProfileId::new(),
                    account_id,
                    legal_name: name.clone(),
                    commercial_name: Some(name),
                    company_type: attrs.company_type.unwrap_or(CompanyType::Legal),
                    company_size: None,
                    completed_shipments: 0,
                    average_rating: 0.0,
                    registered_at: now,
                }))
            }
            AccountRole::Carrier => Ok(Profile::Carrier(CarrierProfile {
                id: ProfileId::new(),
                account_id,
                carrier_type: attrs.carrier_type.unwrap_or(CarrierType::Individual),
                driver_license: None,
                license_expiry: None,
                years_experience: 0,
                max_capacity_kg: None,
                document_status: DocumentStatus::Pending,
                completed_trips: 0,
                average_rating: 0.0,
                registered_at: now,
            })),
        }
    }

    pub fn profile_id(&self) -> ProfileId {
        match self {
            Profile::Company(p) => p.id,
            Profile::Carrier(p) => p.id,
        }
    }

    pub fn account_id(&self) -> AccountId {
        match self {
            Profile::Company(p) => p.account_id,
            Profile::Carrier(p) => p.account_id,
        }
    }

    /// The account role this profile specializes.
    pub fn role(&self) -> AccountRole {
        match self {
            Profile::Company(_) => AccountRole::Company,
            Profile::Carrier(_) => AccountRole::Carrier,
        }
    }

    pub fn as_company(&self) -> Option<&CompanyProfile> {
        match self {
            Profile::Company(p) => Some(p),
            Profile::Carrier(_) => None,
        }
    }

    pub fn as_carrier(&self) -> Option<&CarrierProfile> {
        match self {
            Profile::Carrier(p) => Some(p),
            Profile::Company(_) => None,
        }
    }
}

impl Entity for CompanyProfile {
    type Id = ProfileId;

    fn id(&self) -> &ProfileId {
        &self.id
    }
}

impl Entity for CarrierProfile {
    type Id = ProfileId;

    fn id(&self) -> &ProfileId {
        &self.id
    }
}
