use super::CompanySpecs;
use crate::extract::reveal::RevealAction;
use crate::extract::strategy::{ExtractionStrategy as S, FieldSpec, Read, Transform};
use crate::url::CompanyLayout;

/// Links that never count as an organization's own website
const NOT_A_WEBSITE: &[&str] = &["linkedin.com", "lnkd.in", "mailto:", "tel:", "javascript:"];

pub(super) fn company_specs(layout: CompanyLayout) -> CompanySpecs {
    let description_reveal = match layout {
        CompanyLayout::Sales => RevealAction::new("company description")
            .css("button[data-test-expand-button]")
            .css("button[data-control-name='read_more_description']")
            .css(".ellipsis-button")
            .text("button", "show more"),
        CompanyLayout::Profile => RevealAction::new("company description")
            .css("a.lt-line-clamp__more")
            .css(".lt-line-clamp__more")
            .css("button[aria-label*='See more details']")
            .text("button, a", "see more"),
    };

    CompanySpecs {
        description_reveal,

        name: FieldSpec::new("company name")
            .with(S::css("h1.org-top-card-summary__title"))
            .with(S::css("h1[class*='org-top-card-summary__title']"))
            .with(S::css(".org-top-card-summary__title"))
            .with(S::css("[data-anonymize='company-name']"))
            .with(S::css("h1")),

        website: FieldSpec::new("company website")
            .with(website(".company-overview__website a"))
            .with(website("[data-field='website'] a"))
            .with(website("a[data-control-name='visit_company_website']"))
            .with(website(".org-top-card-primary-actions__inner a"))
            .with(website("dd a[href^='http']"))
            .with(website("a[href^='http']")),

        description: description_field(layout),

        employees: FieldSpec::new("company employees")
            .with(S::css("a[aria-label*='All employees']"))
            .with(S::css("a[aria-label*='employees']"))
            .with(S::text("a", "employees")),

        employees_url: FieldSpec::new("company employees url")
            .with(link("a[aria-label*='All employees']"))
            .with(link("a[aria-label*='employees']")),

        decision_makers: FieldSpec::new("company decision makers")
            .with(S::css("a[aria-label*='Decision makers']"))
            .with(S::css("a[aria-label*='decision makers']"))
            .with(S::text("a", "decision makers")),

        decision_makers_url: FieldSpec::new("company decision makers url")
            .with(link("a[aria-label*='Decision makers']"))
            .with(link("a[aria-label*='decision makers']")),

        personas: FieldSpec::new("company personas").with(
            S::css("a[aria-label*='leads for persona']").read(Read::LabelledLinks {
                separator: "; ".to_string(),
                limit: 20,
            }),
        ),
    }
}

fn description_field(layout: CompanyLayout) -> FieldSpec {
    let spec = FieldSpec::new("company description");
    let spec = match layout {
        CompanyLayout::Sales => spec
            .with(description("p[data-anonymize='company-blurb']"))
            .with(description("[data-anonymize='company-blurb']"))
            .with(description("._description-wrapper_mb60vc p")),
        CompanyLayout::Profile => spec
            .with(description(".lt-line-clamp__raw-line"))
            .with(description(".org-about-module__description .lt-line-clamp__raw-line"))
            .with(description(".org-about-module__description"))
            .with(description(".organization-about-module__content-consistant-cards-description"))
            .with(
                S::css(".lt-line-clamp__line")
                    .named("clamped lines")
                    .joined(" ")
                    .then(Transform::Remove("…see more".to_string()))
                    .min_len(21),
            ),
    };

    spec.with(description("[data-test='about-us-description']"))
        .with(description(".about-us-company-module__description"))
        .with(description(".org-page-details__definition dd"))
        .with(description(".org-about-us__description"))
        .with(description("section[data-test='about-us'] p"))
        .with(description(".org-top-card-summary__description"))
}

fn description(css: &str) -> S {
    S::css(css).then(Transform::Paragraphs).min_len(21)
}

fn website(css: &str) -> S {
    S::css(css)
        .attr("href")
        .then(Transform::Absolutize)
        .containing_none(NOT_A_WEBSITE)
}

fn link(css: &str) -> S {
    S::css(css).attr("href").then(Transform::Absolutize)
}
