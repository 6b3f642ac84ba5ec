//! Per-layout field tables
//!
//! Each page-layout family gets its own set of field specifications. The
//! tables are data only; every field is resolved by the same resolver.
//!
//! Class names on the target site are generated and change often, so most
//! fields carry several fallbacks ordered from most to least specific.

mod company;
mod profile;
mod sales;

use crate::extract::lists::ListSpec;
use crate::extract::reveal::RevealAction;
use crate::extract::strategy::FieldSpec;
use crate::url::{CompanyLayout, Variant};

/// Selector whose presence marks a page's main content as rendered
pub const READY_SELECTOR: &str = "main";

/// Sub-fields resolved inside one experience list item
#[derive(Debug, Clone)]
pub struct ExperienceFields {
    pub role: FieldSpec,
    pub company: FieldSpec,
    pub duration: FieldSpec,
    pub location: FieldSpec,
    pub company_url: FieldSpec,
}

/// Sub-fields resolved inside one education list item
#[derive(Debug, Clone)]
pub struct EducationFields {
    pub institution: FieldSpec,
    pub degree: FieldSpec,
    pub dates: FieldSpec,
}

/// The contact-info panel and its fields
#[derive(Debug, Clone)]
pub struct ContactSpecs {
    pub reveal: RevealAction,
    pub dismiss: RevealAction,
    pub email: FieldSpec,
    pub mobile: FieldSpec,
    /// Resolves to links joined by `; `
    pub websites: FieldSpec,
}

/// Everything resolved from a profile page of one variant
#[derive(Debug, Clone)]
pub struct ProfileSpecs {
    pub name: FieldSpec,
    pub headline: FieldSpec,
    pub location: FieldSpec,

    pub about_reveal: RevealAction,
    pub about: FieldSpec,

    /// Current role summary card, used when the experience list is empty
    pub current_role: Option<FieldSpec>,

    pub experience: ListSpec,
    pub experience_fields: ExperienceFields,

    pub education: Option<(ListSpec, EducationFields)>,

    pub contact: Option<ContactSpecs>,
}

/// Everything resolved from an organization page
#[derive(Debug, Clone)]
pub struct CompanySpecs {
    pub description_reveal: RevealAction,
    pub name: FieldSpec,
    pub website: FieldSpec,
    pub description: FieldSpec,
    pub employees: FieldSpec,
    pub employees_url: FieldSpec,
    pub decision_makers: FieldSpec,
    pub decision_makers_url: FieldSpec,
    pub personas: FieldSpec,
}

impl ProfileSpecs {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Profile => profile::profile_specs(),
            Variant::Sales => sales::sales_specs(),
        }
    }
}

impl CompanySpecs {
    pub fn for_layout(layout: CompanyLayout) -> Self {
        company::company_specs(layout)
    }
}
