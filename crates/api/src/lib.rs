//! `connectcargo-api` — HTTP surface for the account lifecycle core.

pub mod app;
