use super::{ContactSpecs, EducationFields, ExperienceFields, ProfileSpecs};
use crate::extract::lists::ListSpec;
use crate::extract::reveal::RevealAction;
use crate::extract::strategy::{Accept, ExtractionStrategy as S, FieldSpec, Read, Transform};
use crate::record::MAX_WEBSITES;

/// Text that marks a caption as a duration rather than a company
const DURATION_HINTS: &[&str] = &["yr", "mo", "Present", "–", "-"];

/// Words that mark a caption as a work location
const LOCATION_HINTS: &[&str] = &[
    "Remote",
    "Hybrid",
    "On-site",
    "United States",
    "United Kingdom",
    "India",
    "Canada",
    "Australia",
];

pub(super) fn profile_specs() -> ProfileSpecs {
    ProfileSpecs {
        name: FieldSpec::from_selectors(
            "full name",
            &["h1.text-heading-xlarge", "div.text-heading-xlarge", "main h1", "h1"],
        ),

        headline: FieldSpec::from_selectors(
            "headline",
            &[
                "div.text-body-medium.break-words",
                "div.ph5 div.text-body-medium",
                ".pv-text-details__left-panel .text-body-medium",
            ],
        ),

        location: FieldSpec::from_selectors(
            "location",
            &[
                "span.text-body-small.inline.t-black--light.break-words",
                ".pv-text-details__left-panel .pb2 .text-body-small",
                "div.ph5 span.text-body-small",
            ],
        ),

        about_reveal: RevealAction::new("about")
            .css(".pv-about-section a.lt-line-clamp__more")
            .css("a.lt-line-clamp__more")
            .css("a[aria-label*='see more']")
            .text("#about ~ div button, #about ~ div a", "see more"),

        about: FieldSpec::new("about")
            .with(about(".pv-about__summary-text .lt-line-clamp__raw-line"))
            .with(about("div.full-width.t-14.t-normal.t-black span[aria-hidden='true']"))
            .with(about("#about ~ div div.inline-show-more-text span[aria-hidden='true']"))
            .with(about(".pv-about__summary-text"))
            .with(
                S::css(".lt-line-clamp__raw-line, .lt-line-clamp__line")
                    .named("clamped lines")
                    .joined("\n")
                    .then(Transform::Remove("…see more".to_string()))
                    .then(Transform::Paragraphs),
            ),

        current_role: None,

        experience: ListSpec::new("experience")
            .section("#experience", "li.artdeco-list__item")
            .section("#experience", "li.pvs-list__paged-list-item")
            .css("section[data-section='experience'] li")
            .css(".experience-section li"),

        experience_fields: ExperienceFields {
            role: FieldSpec::new("role")
                .with(S::css("div.t-bold span[aria-hidden='true']"))
                .with(S::css("span.t-bold span[aria-hidden='true']"))
                .with(S::css(".display-flex.align-items-center .t-bold span[aria-hidden='true']")),

            company: FieldSpec::new("company").with(
                S::css("span.t-14.t-normal span[aria-hidden='true']")
                    .first_valid()
                    .then(Transform::Before(" · ".to_string()))
                    .containing_none(&["·", " yr", " mo", "Present"]),
            ),

            duration: FieldSpec::new("duration")
                .with(S::css("span.pvs-entity__caption-wrapper[aria-hidden='true']"))
                .with(
                    S::css(".t-14.t-normal.t-black--light span[aria-hidden='true']")
                        .first_valid()
                        .containing_any(DURATION_HINTS),
                ),

            location: FieldSpec::new("location").with(
                S::css(".t-14.t-normal span[aria-hidden='true']")
                    .first_valid()
                    .containing_any(LOCATION_HINTS)
                    .containing_none(&[" yr", " mo", "Present"]),
            ),

            company_url: FieldSpec::new("company url")
                .with(S::css("a[href*='/company/']").attr("href").then(Transform::Absolutize)),
        },

        education: Some((
            ListSpec::new("education")
                .section("#education", "li.artdeco-list__item")
                .section("#education", "li.pvs-list__paged-list-item")
                .css("section[data-section='education'] li")
                .css(".education-section li"),
            EducationFields {
                institution: FieldSpec::new("institution")
                    .with(S::css("div.t-bold span[aria-hidden='true']"))
                    .with(S::css("span.t-bold span[aria-hidden='true']"))
                    .with(S::css("h3.pv-entity__school-name")),
                degree: FieldSpec::new("degree")
                    .with(S::css("span.t-14.t-normal:not(.t-black--light) span[aria-hidden='true']"))
                    .with(S::css(".pv-entity__degree-name .pv-entity__comma-item")),
                dates: FieldSpec::new("dates")
                    .with(S::css("span.pvs-entity__caption-wrapper[aria-hidden='true']"))
                    .with(
                        S::css(".t-14.t-normal.t-black--light span[aria-hidden='true']")
                            .first_valid()
                            .accept(Accept::HasDigit),
                    )
                    .with(S::css(".pv-entity__dates time").joined(" - ")),
            },
        )),

        contact: Some(contact_specs()),
    }
}

fn about(css: &str) -> S {
    S::css(css).then(Transform::Paragraphs).min_len(21)
}

fn contact_specs() -> ContactSpecs {
    ContactSpecs {
        reveal: RevealAction::new("contact info")
            .css("#top-card-text-details-contact-info")
            .css("a[data-control-name='contact_see_more']")
            .css("a[href*='overlay/contact-info']")
            .css("button[aria-label*='contact']"),

        dismiss: RevealAction::new("contact info dismiss")
            .css("button[aria-label='Dismiss']")
            .css(".artdeco-modal__dismiss")
            .css("button.artdeco-button--circle"),

        email: FieldSpec::new("email")
            .with(
                S::css("a[href^='mailto:']")
                    .attr("href")
                    .then(Transform::StripPrefix("mailto:".to_string()))
                    .containing_any(&["@"]),
            )
            .with(S::css(".ci-email .pv-contact-info__contact-link").containing_any(&["@"]))
            .with(
                S::css(".pv-contact-info__contact-type a, .artdeco-modal a")
                    .first_valid()
                    .containing_any(&["@"]),
            ),

        mobile: FieldSpec::new("mobile")
            .with(
                S::css("a[href^='tel:']")
                    .attr("href")
                    .then(Transform::StripPrefix("tel:".to_string()))
                    .accept(Accept::HasDigit),
            )
            .with(
                S::css(".ci-phone .pv-contact-info__contact-link, .ci-phone span.t-14")
                    .first_valid()
                    .accept(Accept::HasDigit),
            ),

        websites: FieldSpec::new("websites")
            .with(websites(".ci-websites a[href^='http']"))
            .with(websites(".pv-contact-info__contact-type a[href^='http']"))
            .with(websites(".artdeco-modal a[href^='http']")),
    }
}

fn websites(css: &str) -> S {
    S::css(css)
        .read(Read::AttrAll {
            attr: "href".to_string(),
            separator: "; ".to_string(),
            limit: MAX_WEBSITES,
        })
        .containing_none(&["linkedin.com", "lnkd.in"])
}
