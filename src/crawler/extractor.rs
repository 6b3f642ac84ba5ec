//! Record extraction from a loaded profile page
//!
//! The extractor reads the page in a few passes:
//! - Top card, experience and education from the initial snapshot
//! - About text, after revealing any truncated section
//! - Contact details, from the contact-info panel when present
//! - Company fields, through a nested visit to the linked organization
//!
//! Every field degrades to an empty string on its own; only a page whose DOM
//! cannot be read at all fails the item.

use crate::crawler::context::{PageContext, Timing};
use crate::crawler::nested::NestedFetcher;
use crate::extract::specs::{ContactSpecs, EducationFields, ExperienceFields};
use crate::extract::{locate_items, resolve, FieldSpec, ListSpec, ProfileSpecs, RevealAction, Scope};
use crate::record::{EducationEntry, ExperienceEntry, ProfileRecord, MAX_EXPERIENCE};
use crate::url::Variant;
use crate::{KumadeError, Result};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

/// Produces a record from the page currently loaded in a context
#[async_trait(?Send)]
pub trait RecordExtractor {
    async fn extract(&self, ctx: &PageContext<'_>, variant: Variant) -> Result<ProfileRecord>;
}

/// Extractor driven by the per-variant field tables
pub struct PageExtractor {
    timing: Timing,
    nested: NestedFetcher,
}

impl PageExtractor {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            nested: NestedFetcher::new(timing),
        }
    }

    /// Reveals hidden content, then resolves `fields` from the resulting DOM
    ///
    /// Falls back to `current_html` when nothing was revealed or the new
    /// snapshot could not be taken.
    async fn read_revealed(
        &self,
        ctx: &PageContext<'_>,
        action: &RevealAction,
        fields: &[&FieldSpec],
        current_html: &str,
        base: Option<&Url>,
    ) -> Vec<String> {
        let revealed = action.run(ctx.driver(), self.timing.reveal).await;
        let html = if revealed {
            match ctx.driver().snapshot().await {
                Ok(html) => html,
                Err(e) => {
                    tracing::debug!("Snapshot after {} failed: {}", action.name, e);
                    current_html.to_string()
                }
            }
        } else {
            current_html.to_string()
        };

        let doc = Html::parse_document(&html);
        let scope = Scope::document(&doc, base);
        fields.iter().map(|f| resolve(&scope, f)).collect()
    }

    async fn read_contact(
        &self,
        ctx: &PageContext<'_>,
        contact: &ContactSpecs,
        record: &mut ProfileRecord,
        current_html: &str,
        base: Option<&Url>,
    ) {
        let fields = [&contact.email, &contact.mobile, &contact.websites];
        let values = self
            .read_revealed(ctx, &contact.reveal, &fields, current_html, base)
            .await;

        if let [email, mobile, websites] = values.as_slice() {
            record.email = email.clone();
            record.mobile = mobile.clone();
            record.websites = websites
                .split("; ")
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect();
        }

        contact.dismiss.run(ctx.driver(), self.timing.reveal).await;
    }
}

#[async_trait(?Send)]
impl RecordExtractor for PageExtractor {
    async fn extract(&self, ctx: &PageContext<'_>, variant: Variant) -> Result<ProfileRecord> {
        let specs = ProfileSpecs::for_variant(variant);
        let base = ctx.base_url().await;
        let mut record = ProfileRecord::new(ctx.url(), variant);

        let html = ctx
            .driver()
            .snapshot()
            .await
            .map_err(|e| KumadeError::Extraction {
                url: ctx.url().to_string(),
                message: e.to_string(),
            })?;

        let current_role = {
            let doc = Html::parse_document(&html);
            let scope = Scope::document(&doc, base.as_ref());

            record.full_name = resolve(&scope, &specs.name);
            record.headline = resolve(&scope, &specs.headline);
            record.location = resolve(&scope, &specs.location);
            record.experience =
                read_experience(&scope, &specs.experience, &specs.experience_fields);
            if let Some((list, fields)) = &specs.education {
                record.education = read_education(&scope, list, fields);
            }

            specs
                .current_role
                .as_ref()
                .map(|field| resolve(&scope, field))
                .unwrap_or_default()
        };

        let about = self
            .read_revealed(ctx, &specs.about_reveal, &[&specs.about], &html, base.as_ref())
            .await;
        record.about = about.into_iter().next().unwrap_or_default();

        if let Some(contact) = &specs.contact {
            self.read_contact(ctx, contact, &mut record, &html, base.as_ref())
                .await;
        }

        record.company_url = record
            .experience
            .first()
            .and_then(|e| e.company_url.clone())
            .unwrap_or_default();
        if !record.company_url.is_empty() {
            record.company = self.nested.fetch_company(ctx, &record.company_url).await;
        }

        record.current_position = current_position(&record, &current_role);

        if record.full_name.is_empty() {
            tracing::warn!("No name resolved on {}", ctx.url());
        }
        tracing::debug!(
            "Extracted '{}' ({} experience entries, company '{}')",
            record.full_name,
            record.experience.len(),
            record.company_name()
        );

        Ok(record)
    }
}

fn read_experience(
    scope: &Scope<'_>,
    list: &ListSpec,
    fields: &ExperienceFields,
) -> Vec<ExperienceEntry> {
    locate_items(scope, list)
        .into_iter()
        .map(|item| {
            let item = scope.within(item);
            let company_url = resolve(&item, &fields.company_url);
            ExperienceEntry {
                role: resolve(&item, &fields.role),
                company: resolve(&item, &fields.company),
                duration: resolve(&item, &fields.duration),
                location: resolve(&item, &fields.location),
                company_url: (!company_url.is_empty()).then_some(company_url),
            }
        })
        .filter(ExperienceEntry::is_retained)
        .take(MAX_EXPERIENCE)
        .collect()
}

fn read_education(
    scope: &Scope<'_>,
    list: &ListSpec,
    fields: &EducationFields,
) -> Vec<EducationEntry> {
    locate_items(scope, list)
        .into_iter()
        .map(|item| {
            let item = scope.within(item);
            EducationEntry {
                institution: resolve(&item, &fields.institution),
                degree: resolve(&item, &fields.degree),
                dates: resolve(&item, &fields.dates),
            }
        })
        .filter(EducationEntry::is_retained)
        .collect()
}

/// Picks the current position line
///
/// Preference order: the first experience entry, the role summary card, then
/// the headline. A headline that already names an employer is used as is;
/// a bare one is joined with the visited company's name when that is known.
pub fn current_position(record: &ProfileRecord, current_role: &str) -> String {
    if let Some(first) = record.experience.first() {
        let rendered = first.render();
        if !rendered.is_empty() {
            return rendered;
        }
    }
    if !current_role.is_empty() {
        return current_role.to_string();
    }

    let headline = record.headline.trim();
    let company = record.company.name.trim();
    if headline.is_empty() {
        String::new()
    } else if company.is_empty() || names_employer(headline) {
        headline.to_string()
    } else {
        format!("{} at {}", headline, company)
    }
}

/// Whether a headline carries its own "at <employer>" clause
fn names_employer(headline: &str) -> bool {
    let lower = headline.to_lowercase();
    lower.contains(" at ") || lower.contains(" @ ")
}
