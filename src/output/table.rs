//! Fixed column schema and the in-memory result table
//!
//! Every row, whether a genuine extraction or a failure placeholder, holds
//! exactly one cell per [`Column`] in declaration order.

use crate::record::{CrawlOutcome, FailedItem, ProfileRecord};
use chrono::SecondsFormat;

/// Number of columns in the persisted table
pub const COLUMN_COUNT: usize = 27;

/// Prefix of the name cell in placeholder rows
pub const ERROR_MARKER: &str = "ERROR:";

/// One column of the persisted table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    FirstName,
    LastName,
    FullName,
    Designation,
    CurrentPosition,
    About,
    Location,
    City,
    State,
    Country,
    Email,
    MobileNo,
    Websites,
    Experience,
    Education,
    CompanyName,
    CompanyUrl,
    CompanyWebsite,
    CompanyDescription,
    CompanyEmployees,
    CompanyEmployeesUrl,
    CompanyDecisionMakers,
    CompanyDecisionMakersUrl,
    CompanyPersonas,
    Variant,
    ProfileUrl,
    ScrapedAt,
}

impl Column {
    /// All columns in output order
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::FirstName,
        Column::LastName,
        Column::FullName,
        Column::Designation,
        Column::CurrentPosition,
        Column::About,
        Column::Location,
        Column::City,
        Column::State,
        Column::Country,
        Column::Email,
        Column::MobileNo,
        Column::Websites,
        Column::Experience,
        Column::Education,
        Column::CompanyName,
        Column::CompanyUrl,
        Column::CompanyWebsite,
        Column::CompanyDescription,
        Column::CompanyEmployees,
        Column::CompanyEmployeesUrl,
        Column::CompanyDecisionMakers,
        Column::CompanyDecisionMakersUrl,
        Column::CompanyPersonas,
        Column::Variant,
        Column::ProfileUrl,
        Column::ScrapedAt,
    ];

    /// Header text written to tabular files
    pub fn header(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::FullName => "Full Name",
            Self::Designation => "Designation",
            Self::CurrentPosition => "Current Position",
            Self::About => "About",
            Self::Location => "Location",
            Self::City => "City",
            Self::State => "State",
            Self::Country => "Country",
            Self::Email => "Email",
            Self::MobileNo => "Mobile No.",
            Self::Websites => "Websites",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::CompanyName => "Company Name",
            Self::CompanyUrl => "Company Url",
            Self::CompanyWebsite => "Company Website",
            Self::CompanyDescription => "Company Description",
            Self::CompanyEmployees => "Company Employees",
            Self::CompanyEmployeesUrl => "Company Employees Url",
            Self::CompanyDecisionMakers => "Company Decision Makers",
            Self::CompanyDecisionMakersUrl => "Company Decision Makers Url",
            Self::CompanyPersonas => "Company Personas",
            Self::Variant => "Variant",
            Self::ProfileUrl => "Profile Url",
            Self::ScrapedAt => "Scraped At",
        }
    }

    /// Column identifier used by the database backend
    pub fn db_name(&self) -> String {
        self.header()
            .chars()
            .filter_map(|c| match c {
                ' ' => Some('_'),
                '.' => None,
                c => Some(c.to_ascii_lowercase()),
            })
            .collect()
    }

    /// Looks up a column by header text, ignoring case and surrounding spaces
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.header().eq_ignore_ascii_case(header))
    }

    /// Position of this column in the output
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One row of the result table, always exactly `COLUMN_COUNT` cells wide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    cells: [String; COLUMN_COUNT],
}

impl Default for TableRow {
    fn default() -> Self {
        Self::empty()
    }
}

impl TableRow {
    pub fn empty() -> Self {
        Self {
            cells: std::array::from_fn(|_| String::new()),
        }
    }

    pub fn get(&self, column: Column) -> &str {
        &self.cells[column.index()]
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.cells[column.index()] = value.into();
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Builds a row from cells already in column order
    ///
    /// Missing trailing cells are left empty and surplus cells are dropped.
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut row = Self::empty();
        for (slot, value) in row.cells.iter_mut().zip(cells) {
            *slot = value;
        }
        row
    }

    /// Projects a row read under arbitrary headers onto the fixed schema
    ///
    /// Cells under unknown headers are dropped and absent columns stay empty.
    pub fn from_named_cells<'a, H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut row = Self::empty();
        for (header, value) in headers.into_iter().zip(values) {
            if let Some(column) = Column::from_header(header) {
                row.set(column, value);
            }
        }
        row
    }

    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        match outcome {
            CrawlOutcome::Extracted(record) => Self::from_record(record),
            CrawlOutcome::Failed(failed) => Self::from_failed(failed),
        }
    }

    pub fn from_record(record: &ProfileRecord) -> Self {
        let mut row = Self::empty();
        let location = record.location_parts();

        row.set(Column::FirstName, record.first_name());
        row.set(Column::LastName, record.last_name());
        row.set(Column::FullName, record.full_name.as_str());
        row.set(Column::Designation, record.headline.as_str());
        row.set(Column::CurrentPosition, record.current_position.as_str());
        row.set(Column::About, record.about.as_str());
        row.set(Column::Location, record.location.as_str());
        row.set(Column::City, location.city);
        row.set(Column::State, location.state);
        row.set(Column::Country, location.country);
        row.set(Column::Email, record.email.as_str());
        row.set(Column::MobileNo, record.mobile.as_str());
        row.set(Column::Websites, record.websites_text());
        row.set(Column::Experience, record.experience_text());
        row.set(Column::Education, record.education_text());
        row.set(Column::CompanyName, record.company_name());
        row.set(Column::CompanyUrl, record.company_url.as_str());

        let company = &record.company;
        row.set(Column::CompanyWebsite, company.website.as_str());
        row.set(Column::CompanyDescription, company.description.as_str());
        row.set(Column::CompanyEmployees, company.employees.as_str());
        row.set(Column::CompanyEmployeesUrl, company.employees_url.as_str());
        row.set(Column::CompanyDecisionMakers, company.decision_makers.as_str());
        row.set(
            Column::CompanyDecisionMakersUrl,
            company.decision_makers_url.as_str(),
        );
        row.set(Column::CompanyPersonas, company.personas.as_str());

        row.set(Column::Variant, record.variant.as_str());
        row.set(Column::ProfileUrl, record.source_url.as_str());
        row.set(
            Column::ScrapedAt,
            record.scraped_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        row
    }

    pub fn from_failed(failed: &FailedItem) -> Self {
        let mut row = Self::empty();
        row.set(Column::FullName, failed.marker());
        row.set(Column::Variant, failed.variant.as_str());
        row.set(Column::ProfileUrl, failed.url.as_str());
        row.set(
            Column::ScrapedAt,
            failed.scraped_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        row
    }

    /// Returns true if this row stands in for a failed item
    pub fn is_placeholder(&self) -> bool {
        self.get(Column::FullName).starts_with(ERROR_MARKER)
    }
}

/// The full persisted output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn headers() -> [&'static str; COLUMN_COUNT] {
        Column::ALL.map(|c| c.header())
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: TableRow) {
        self.rows.push(row);
    }
}
