//! Nested organization page fetch
//!
//! While extracting a profile, the organization linked from the first
//! experience entry is visited to fill the company fields. The fetch always
//! returns the browser to the profile page afterwards, on every exit path:
//! success, error, timeout or panic. A failed fetch yields an empty record.

use crate::browser::PageDriver;
use crate::crawler::context::{load_page, PageContext, Timing};
use crate::extract::{resolve, CompanySpecs, Scope, READY_SELECTOR};
use crate::record::CompanyRecord;
use crate::url::classify_company;
use crate::Result;
use futures::FutureExt;
use scraper::Html;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use url::Url;

/// Slack added to the overall bound on one nested visit
const VISIT_SLACK: Duration = Duration::from_secs(5);

/// Visits organization pages on behalf of the extractor
#[derive(Debug, Clone, Copy)]
pub struct NestedFetcher {
    timing: Timing,
}

impl NestedFetcher {
    pub fn new(timing: Timing) -> Self {
        Self { timing }
    }

    /// Upper bound on a whole visit, return navigation excluded
    fn budget(&self) -> Duration {
        self.timing.page + self.timing.ready + self.timing.settle + self.timing.reveal + VISIT_SLACK
    }

    /// Resolves the organization at `company_url`, then returns to the origin
    ///
    /// # Arguments
    ///
    /// * `ctx` - The page being extracted; its current URL is restored afterwards
    /// * `company_url` - Absolute organization URL
    ///
    /// # Returns
    ///
    /// The resolved record, or an all-empty record when the visit failed.
    pub async fn fetch_company(&self, ctx: &PageContext<'_>, company_url: &str) -> CompanyRecord {
        if company_url.trim().is_empty() {
            return CompanyRecord::default();
        }

        let driver = ctx.driver();
        let origin = match driver.current_url().await {
            Ok(url) if !url.is_empty() => url,
            _ => ctx.url().to_string(),
        };

        tracing::info!("Fetching company page {}", company_url);
        let visit = AssertUnwindSafe(self.visit(driver, company_url)).catch_unwind();
        let company = match tokio::time::timeout(self.budget(), visit).await {
            Ok(Ok(Ok(company))) => company,
            Ok(Ok(Err(e))) => {
                tracing::warn!("Company fetch failed for {}: {}", company_url, e);
                CompanyRecord::default()
            }
            Ok(Err(_)) => {
                tracing::warn!("Company fetch panicked for {}", company_url);
                CompanyRecord::default()
            }
            Err(_) => {
                tracing::warn!(
                    "Company fetch for {} exceeded {}s",
                    company_url,
                    self.budget().as_secs()
                );
                CompanyRecord::default()
            }
        };

        self.restore(driver, &origin).await;
        company
    }

    async fn visit(&self, driver: &dyn PageDriver, company_url: &str) -> Result<CompanyRecord> {
        load_page(driver, company_url, &self.timing).await?;

        let specs = CompanySpecs::for_layout(classify_company(company_url));
        specs.description_reveal.run(driver, self.timing.reveal).await;

        let base = driver
            .current_url()
            .await
            .ok()
            .and_then(|u| Url::parse(&u).ok())
            .or_else(|| Url::parse(company_url).ok());
        let html = driver.snapshot().await?;

        let company = resolve_company(&html, base.as_ref(), &specs);
        if company.is_empty() {
            tracing::warn!("No company fields resolved on {}", company_url);
        } else {
            tracing::debug!("Resolved company '{}'", company.name);
        }
        Ok(company)
    }

    async fn restore(&self, driver: &dyn PageDriver, origin: &str) {
        match tokio::time::timeout(self.timing.page, driver.navigate(origin)).await {
            Ok(Ok(())) => {
                if !matches!(
                    driver.wait_for_ready(READY_SELECTOR, self.timing.ready).await,
                    Ok(true)
                ) {
                    tracing::debug!("Origin page {} not ready after return", origin);
                }
            }
            Ok(Err(e)) => tracing::warn!("Failed to return to {}: {}", origin, e),
            Err(_) => tracing::warn!("Timed out returning to {}", origin),
        }
    }
}

/// Resolves every company field from an organization page snapshot
pub fn resolve_company(html: &str, base: Option<&Url>, specs: &CompanySpecs) -> CompanyRecord {
    let doc = Html::parse_document(html);
    let scope = Scope::document(&doc, base);

    CompanyRecord {
        name: resolve(&scope, &specs.name),
        website: resolve(&scope, &specs.website),
        description: resolve(&scope, &specs.description),
        employees: resolve(&scope, &specs.employees),
        employees_url: resolve(&scope, &specs.employees_url),
        decision_makers: resolve(&scope, &specs.decision_makers),
        decision_makers_url: resolve(&scope, &specs.decision_makers_url),
        personas: resolve(&scope, &specs.personas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::MemoryDriver;

    const PROFILE: &str = "https://www.linkedin.com/in/jane/";
    const COMPANY: &str = "https://www.linkedin.com/company/acme/";
    const SALES_COMPANY: &str = "https://www.linkedin.com/sales/company/1234";

    const PROFILE_HTML: &str = "<html><body><main><h1>Jane Doe</h1></main></body></html>";

    const COMPANY_HTML: &str = r#"<html><body><main>
        <h1 class="org-top-card-summary__title">Acme Corp</h1>
        <a href="https://www.linkedin.com/company/acme/jobs">Jobs</a>
        <a href="https://acme.example/">Website</a>
        <p class="org-about-module__description">Acme builds rockets, anvils and other fine desert equipment.</p>
    </main></body></html>"#;

    const SALES_COMPANY_HTML: &str = r#"<html><body><main>
        <div data-anonymize="company-name">Acme Corp</div>
        <a data-control-name="visit_company_website" href="https://acme.example">acme.example</a>
        <p data-anonymize="company-blurb">Short…</p>
        <button data-test-expand-button>Show more</button>
        <a aria-label="All employees (1,204)" href="/sales/search/people?companyIncluded=1234">1,204 employees</a>
        <a aria-label="Decision makers (37)" href="/sales/search/people?companyIncluded=1234&amp;seniority=dm">37 decision makers</a>
        <a aria-label="View 12 leads for persona Engineering" href="/sales/search/people?persona=eng">Engineering</a>
        <a aria-label="View 4 leads for persona Finance" href="/sales/search/people?persona=fin">Finance</a>
    </main></body></html>"#;

    const SALES_COMPANY_EXPANDED: &str = r#"<html><body><main>
        <div data-anonymize="company-name">Acme Corp</div>
        <a data-control-name="visit_company_website" href="https://acme.example">acme.example</a>
        <p data-anonymize="company-blurb">Acme builds rockets, anvils and other fine desert equipment.</p>
        <a aria-label="All employees (1,204)" href="/sales/search/people?companyIncluded=1234">1,204 employees</a>
        <a aria-label="Decision makers (37)" href="/sales/search/people?companyIncluded=1234&amp;seniority=dm">37 decision makers</a>
        <a aria-label="View 12 leads for persona Engineering" href="/sales/search/people?persona=eng">Engineering</a>
        <a aria-label="View 4 leads for persona Finance" href="/sales/search/people?persona=fin">Finance</a>
    </main></body></html>"#;

    fn fetcher() -> NestedFetcher {
        NestedFetcher::new(Timing {
            page: Duration::from_secs(5),
            ready: Duration::from_secs(1),
            settle: Duration::ZERO,
            reveal: Duration::ZERO,
        })
    }

    async fn on_profile(driver: MemoryDriver) -> MemoryDriver {
        let driver = driver.with_page(PROFILE, PROFILE_HTML);
        driver.navigate(PROFILE).await.unwrap();
        driver
    }

    #[tokio::test]
    async fn test_fetches_company_and_returns() {
        let driver = on_profile(MemoryDriver::new().with_page(COMPANY, COMPANY_HTML)).await;
        let ctx = PageContext::new(&driver, PROFILE);

        let company = fetcher().fetch_company(&ctx, COMPANY).await;

        assert_eq!(company.name, "Acme Corp");
        assert_eq!(company.website, "https://acme.example/");
        assert_eq!(
            company.description,
            "Acme builds rockets, anvils and other fine desert equipment."
        );
        assert_eq!(driver.current_url().await.unwrap(), PROFILE);
        assert_eq!(driver.history(), vec![PROFILE, COMPANY, PROFILE]);
    }

    #[tokio::test]
    async fn test_sales_company_layout() {
        let driver = on_profile(
            MemoryDriver::new()
                .with_page(SALES_COMPANY, SALES_COMPANY_HTML)
                .with_expansion(SALES_COMPANY, "button[data-test-expand-button]", SALES_COMPANY_EXPANDED),
        )
        .await;
        let ctx = PageContext::new(&driver, PROFILE);

        let company = fetcher().fetch_company(&ctx, SALES_COMPANY).await;

        assert_eq!(company.name, "Acme Corp");
        assert_eq!(company.website, "https://acme.example/");
        assert_eq!(
            company.description,
            "Acme builds rockets, anvils and other fine desert equipment."
        );
        assert_eq!(company.employees, "1,204 employees");
        assert_eq!(
            company.employees_url,
            "https://www.linkedin.com/sales/search/people?companyIncluded=1234"
        );
        assert_eq!(company.decision_makers, "37 decision makers");
        assert_eq!(
            company.personas,
            "Engineering|https://www.linkedin.com/sales/search/people?persona=eng; \
             Finance|https://www.linkedin.com/sales/search/people?persona=fin"
        );
        assert_eq!(driver.current_url().await.unwrap(), PROFILE);
    }

    #[tokio::test]
    async fn test_failed_navigation_still_restores_origin() {
        let driver = on_profile(MemoryDriver::new().with_failure(COMPANY)).await;
        let ctx = PageContext::new(&driver, PROFILE);

        let company = fetcher().fetch_company(&ctx, COMPANY).await;

        assert!(company.is_empty());
        assert_eq!(driver.current_url().await.unwrap(), PROFILE);
        assert_eq!(driver.history(), vec![PROFILE, PROFILE]);
    }

    #[tokio::test]
    async fn test_page_without_main_content_restores_origin() {
        let driver = on_profile(
            MemoryDriver::new().with_page(COMPANY, "<html><body><p>Sign in</p></body></html>"),
        )
        .await;
        let ctx = PageContext::new(&driver, PROFILE);

        let company = fetcher().fetch_company(&ctx, COMPANY).await;

        assert!(company.is_empty());
        assert_eq!(driver.current_url().await.unwrap(), PROFILE);
    }

    #[tokio::test]
    async fn test_company_page_with_no_matches_restores_origin() {
        let driver = on_profile(
            MemoryDriver::new().with_page(COMPANY, "<html><body><main><p>nothing</p></main></body></html>"),
        )
        .await;
        let ctx = PageContext::new(&driver, PROFILE);

        let company = fetcher().fetch_company(&ctx, COMPANY).await;

        assert!(company.is_empty());
        assert_eq!(driver.history(), vec![PROFILE, COMPANY, PROFILE]);
        assert_eq!(driver.current_url().await.unwrap(), PROFILE);
    }

    #[tokio::test]
    async fn test_empty_url_is_skipped() {
        let driver = on_profile(MemoryDriver::new()).await;
        let ctx = PageContext::new(&driver, PROFILE);

        assert!(fetcher().fetch_company(&ctx, "  ").await.is_empty());
        assert_eq!(driver.history(), vec![PROFILE]);
    }
}
