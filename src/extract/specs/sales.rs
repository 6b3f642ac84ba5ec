use super::{ExperienceFields, ProfileSpecs};
use crate::extract::lists::ListSpec;
use crate::extract::reveal::RevealAction;
use crate::extract::strategy::{ExtractionStrategy as S, FieldSpec, Transform};

const LOCKUP: &str = "div._lockup-content-overflow-hidden_p4eb22";

pub(super) fn sales_specs() -> ProfileSpecs {
    ProfileSpecs {
        name: FieldSpec::new("full name")
            .with(S::path("#profile-card-section", "section[1]/div[1]/div[2]/h1").named("card path"))
            .with(S::css(".profile-topcard-person__name"))
            .with(S::css("h1.profile-topcard-person__name"))
            .with(S::css("#profile-card-section h1"))
            .with(S::css("h1[data-anonymize='person-name']")),

        headline: FieldSpec::new("headline")
            .with(S::css("#profile-card-section .profile-topcard__headline"))
            .with(S::css(".profile-topcard__headline"))
            .with(S::css(".profile-topcard__headline-text"))
            .with(S::css(".profile-topcard-person__headline"))
            .with(S::css("[data-anonymize='headline']"))
            .with(
                S::path("#profile-card-section", "section[1]/div[1]/div[3]")
                    .named("card path")
                    .then(Transform::FirstLine),
            ),

        location: FieldSpec::new("location")
            .with(S::css(".profile-topcard__location"))
            .with(S::css(".profile-topcard-person__location"))
            .with(S::css("#profile-card-section [data-anonymize='location']")),

        about_reveal: RevealAction::new("about")
            .css("button._ellipsis-button_1d1vlq")
            .css("button[id^='ellipsis-button-']")
            .css("button[data-test-expand-button]")
            .css("#about-section button[type='button']")
            .text("button", "show more"),

        about: FieldSpec::new("about")
            .with(about("div[data-anonymize='person-blurb']"))
            .with(about("#about-section div._content-width_1dtbsb"))
            .with(about("div[id*='clamped-content']"))
            .with(about("._about-section_1dtbsb ._bodyText_1e5nen")),

        current_role: Some(
            FieldSpec::new("current role").with(
                S::css(&format!(
                    "{lockup} p._current-role-item_th0xau, {lockup} p._bodyText_1e5nen",
                    lockup = LOCKUP
                ))
                .named("role lockup")
                .joined(" "),
            ),
        ),

        experience: ListSpec::new("experience")
            .path("#scroll-to-experience-section", "div/ul", "li._experience-entry_1irc72")
            .css("#scroll-to-experience-section li._experience-entry_1irc72")
            .css("#experience-section li"),

        experience_fields: ExperienceFields {
            role: FieldSpec::new("role")
                .with(S::css("h2[data-anonymize='job-title']"))
                .with(S::css("[data-anonymize='job-title']")),

            company: FieldSpec::new("company")
                .with(S::css("p[data-anonymize='company-name']"))
                .with(S::css("[data-anonymize='company-name']")),

            duration: FieldSpec::new("duration")
                .with(S::css("span.FaIDAmBvHCUAhRDrOYReTwrRgdFObBlKKw").joined(" "))
                .with(
                    S::css("p._bodyText_1e5nen")
                        .first_valid()
                        .containing_any(&["yr", "mo", "Present", "–"]),
                ),

            location: FieldSpec::new("location")
                .with(S::css("p.IcGLmQVeFqxrUMEeMBuKbysvdrtdpDiSlHJY"))
                .with(S::css("[data-anonymize='location']")),

            company_url: FieldSpec::new("company url").with(
                S::css("a[href*='/sales/company/']")
                    .attr("href")
                    .then(Transform::Absolutize),
            ),
        },

        education: None,
        contact: None,
    }
}

fn about(css: &str) -> S {
    S::css(css)
        .joined("\n\n")
        .then(Transform::Remove("… Show more".to_string()))
        .then(Transform::Remove("…Show more".to_string()))
        .then(Transform::Paragraphs)
        .min_len(21)
}
