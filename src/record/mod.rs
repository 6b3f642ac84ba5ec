//! Record types produced by the extractors
//!
//! A visited URL yields exactly one [`CrawlOutcome`]: either a fully populated
//! (possibly sparse) [`ProfileRecord`], or a [`FailedItem`] carrying the error
//! that aborted the item. Both are projected onto the fixed output schema by the
//! output module.

mod names;

pub use names::{split_location, split_name, LocationParts};

use crate::url::Variant;
use chrono::{DateTime, Utc};

/// Upper bound on experience entries kept per record
pub const MAX_EXPERIENCE: usize = 5;

/// Upper bound on personal websites kept per record
pub const MAX_WEBSITES: usize = 3;

/// One position from a profile's experience section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    /// Link to the organization page, absolutized against the profile URL
    pub company_url: Option<String>,
}

impl ExperienceEntry {
    /// An entry is kept only if at least the role or the company resolved
    pub fn is_retained(&self) -> bool {
        !self.role.is_empty() || !self.company.is_empty()
    }

    /// Renders as `Role at Company (Duration) [Location]`, omitting absent parts
    pub fn render(&self) -> String {
        let mut out = match (self.role.is_empty(), self.company.is_empty()) {
            (false, false) => format!("{} at {}", self.role, self.company),
            (false, true) => self.role.clone(),
            (true, false) => self.company.clone(),
            (true, true) => String::new(),
        };

        if !self.duration.is_empty() {
            out.push_str(&format!(" ({})", self.duration));
        }
        if !self.location.is_empty() {
            out.push_str(&format!(" [{}]", self.location));
        }

        out
    }
}

/// One entry from a profile's education section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub dates: String,
}

impl EducationEntry {
    pub fn is_retained(&self) -> bool {
        !self.institution.is_empty() || !self.degree.is_empty()
    }

    /// Renders as `Degree · Institution · Dates`, omitting absent parts
    pub fn render(&self) -> String {
        [&self.degree, &self.institution, &self.dates]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Sub-record resolved from a linked organization page
///
/// All fields are empty when the nested fetch failed or was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyRecord {
    pub name: String,
    pub website: String,
    pub description: String,
    pub employees: String,
    pub employees_url: String,
    pub decision_makers: String,
    pub decision_makers_url: String,
    /// `label|url` pairs joined by `; `
    pub personas: String,
}

impl CompanyRecord {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything extracted from one successfully visited page
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub variant: Variant,
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,

    pub full_name: String,
    pub headline: String,
    pub current_position: String,
    pub about: String,
    pub location: String,

    pub email: String,
    pub mobile: String,
    pub websites: Vec<String>,

    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,

    /// Organization URL taken from the first experience entry
    pub company_url: String,
    pub company: CompanyRecord,
}

impl ProfileRecord {
    /// Creates an empty record for the given page
    pub fn new(source_url: impl Into<String>, variant: Variant) -> Self {
        Self {
            variant,
            source_url: source_url.into(),
            scraped_at: Utc::now(),
            full_name: String::new(),
            headline: String::new(),
            current_position: String::new(),
            about: String::new(),
            location: String::new(),
            email: String::new(),
            mobile: String::new(),
            websites: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            company_url: String::new(),
            company: CompanyRecord::default(),
        }
    }

    pub fn first_name(&self) -> &str {
        split_name(&self.full_name).0
    }

    pub fn last_name(&self) -> &str {
        split_name(&self.full_name).1
    }

    pub fn location_parts(&self) -> LocationParts {
        split_location(&self.location)
    }

    pub fn experience_text(&self) -> String {
        self.experience
            .iter()
            .take(MAX_EXPERIENCE)
            .map(ExperienceEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn education_text(&self) -> String {
        self.education
            .iter()
            .map(EducationEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn websites_text(&self) -> String {
        self.websites
            .iter()
            .take(MAX_WEBSITES)
            .cloned()
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Company name, preferring the organization page over the experience entry
    pub fn company_name(&self) -> &str {
        if !self.company.name.is_empty() {
            return &self.company.name;
        }
        self.experience
            .first()
            .map(|e| e.company.as_str())
            .unwrap_or("")
    }
}

/// An item whose page load or extraction failed
#[derive(Debug, Clone)]
pub struct FailedItem {
    pub url: String,
    pub variant: Variant,
    pub error: String,
    pub scraped_at: DateTime<Utc>,
}

impl FailedItem {
    pub fn new(url: impl Into<String>, variant: Variant, error: impl ToString) -> Self {
        Self {
            url: url.into(),
            variant,
            error: error.to_string(),
            scraped_at: Utc::now(),
        }
    }

    /// Value written into the name column of the placeholder row
    pub fn marker(&self) -> String {
        format!("ERROR: {}", self.error)
    }
}

/// Per-item result of the crawl loop
#[derive(Debug, Clone)]
pub enum CrawlOutcome {
    Extracted(ProfileRecord),
    Failed(FailedItem),
}

impl CrawlOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Extracted(r) => &r.source_url,
            Self::Failed(f) => &f.url,
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Self::Extracted(r) => r.variant,
            Self::Failed(f) => f.variant,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }
}
