//! Field extraction from rendered pages
//!
//! This module handles:
//! - The declarative strategy model ([`FieldSpec`], [`ExtractionStrategy`])
//! - The field resolver that evaluates strategies in order
//! - List locators for repeated sections
//! - Reveal actions for content hidden behind toggles
//! - Field tables per page-layout family

pub mod dom;
mod lists;
mod resolver;
mod reveal;
pub mod specs;
mod strategy;

pub use dom::Scope;
pub use lists::{locate_items, ListLocator, ListSpec};
pub use resolver::{apply_strategy, locate, parse_path, resolve, resolve_traced, PathStep, Resolution};
pub use reveal::{RevealAction, Trigger};
pub use specs::{CompanySpecs, ProfileSpecs, READY_SELECTOR};
pub use strategy::{
    normalize_paragraphs, Accept, ExtractionStrategy, FieldSpec, Locator, Read, Transform,
    MIN_VALUE_LEN,
};
