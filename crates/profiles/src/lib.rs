//! `connectcargo-profiles` — the Company/Carrier business record bound
//! one-to-one to an account.

pub mod profile;

pub use profile::{
    CarrierProfile, CarrierType, CompanyProfile, CompanySize, CompanyType, DocumentStatus,
    Profile, ProfileAttributes,
};
