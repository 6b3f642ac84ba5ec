//! URL handling module for Kumade
//!
//! This module provides page-layout classification for target URLs, acceptance
//! rules for URLs read from the input table, and link absolutization.

mod classify;
mod normalize;

pub use classify::{classify, classify_company, CompanyLayout, Variant};
pub use normalize::{absolutize, clean_input_value, is_http_url};
