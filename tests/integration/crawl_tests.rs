//! Integration tests for the crawler
//!
//! These tests drive full runs against the in-memory page driver, replaying
//! fixture HTML in place of a live browser, and check what lands in the
//! persisted result table.

use kumade::browser::MemoryDriver;
use kumade::config::{
    BrowserConfig, Config, CrawlerConfig, InputConfig, LoginConfig, OutputConfig,
};
use kumade::crawler::{Coordinator, PageExtractor, PreAuthenticated, Timing};
use kumade::input::load_targets;
use kumade::output::{table_statistics, Column, ResultTable};
use kumade::storage::{open_store, CsvTableStore, SqliteTableStore, TableStore};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const JANE: &str = "https://www.linkedin.com/in/jane/";
const GONE: &str = "https://www.linkedin.com/in/gone/";
const JOHN: &str = "https://www.linkedin.com/sales/lead/ACw1,NAME_SEARCH";
const ACME: &str = "https://www.linkedin.com/company/acme/";

const JANE_HTML: &str = r#"<html><body><main>
  <div class="ph5">
    <h1 class="text-heading-xlarge">Jane Doe</h1>
    <div class="text-body-medium break-words">Staff Engineer at Acme</div>
    <span class="text-body-small inline t-black--light break-words">Austin, Texas, United States</span>
  </div>
  <section>
    <div id="experience"></div>
    <ul>
      <li class="artdeco-list__item">
        <a href="/company/acme/">logo</a>
        <div class="t-bold"><span aria-hidden="true">Staff Engineer</span></div>
        <span class="t-14 t-normal"><span aria-hidden="true">Acme · Full-time</span></span>
      </li>
    </ul>
  </section>
</main></body></html>"#;

const ACME_HTML: &str = r#"<html><body><main>
  <h1 class="org-top-card-summary__title">Acme Corp</h1>
  <a href="https://acme.example/">Website</a>
  <p class="org-about-module__description">Acme builds rockets, anvils and other fine desert equipment.</p>
</main></body></html>"#;

const JOHN_HTML: &str = r#"<html><body><main>
  <section id="profile-card-section">
    <section>
      <div>
        <div></div>
        <div><h1>John Smith</h1></div>
        <div>VP Sales at Globex<div>2nd</div></div>
      </div>
    </section>
  </section>
  <div class="profile-topcard__location">London, United Kingdom</div>
</main></body></html>"#;

const LOGIN_HTML: &str = "<html><body><main>Sign in</main></body></html>";

/// Creates a test configuration with files inside `dir`
fn create_test_config(dir: &TempDir, output: &str, min_delay_ms: u64, max_delay_ms: u64) -> Config {
    Config {
        crawler: CrawlerConfig {
            min_delay_ms,
            max_delay_ms,
            page_timeout_secs: 5,
            ready_timeout_secs: 1,
            settle_ms: 0, // No settling in tests
            reveal_settle_ms: 0,
        },
        browser: BrowserConfig::default(),
        input: InputConfig {
            path: dir.path().join("targets.csv").display().to_string(),
            url_column: "LinkedIn URL".to_string(),
        },
        output: OutputConfig {
            path: dir.path().join(output).display().to_string(),
        },
        login: LoginConfig::default(),
    }
}

/// Writes the input table; sales lead URLs contain commas, so fields are quoted
fn write_input(config: &Config, urls: &[&str]) {
    let mut writer = csv::Writer::from_path(&config.input.path).unwrap();
    writer.write_record(["Name", "LinkedIn URL"]).unwrap();
    for (i, url) in urls.iter().enumerate() {
        writer.write_record([format!("person {}", i).as_str(), *url]).unwrap();
    }
    writer.flush().unwrap();
}

fn driver() -> MemoryDriver {
    let login = LoginConfig::default();
    MemoryDriver::new()
        .with_page(&login.profile_url, LOGIN_HTML)
        .with_page(&login.sales_url, LOGIN_HTML)
        .with_page(JANE, JANE_HTML)
        .with_page(ACME, ACME_HTML)
        .with_page(JOHN, JOHN_HTML)
        .with_failure(GONE)
}

async fn run_batch(config: &Config, driver: &MemoryDriver, store: Box<dyn TableStore>) -> usize {
    let urls = load_targets(Path::new(&config.input.path), &config.input.url_column).unwrap();
    let extractor = PageExtractor::new(Timing::from_config(&config.crawler));
    let mut coordinator = Coordinator::new(config, driver, &extractor, &PreAuthenticated, store);
    coordinator.run(&urls).await.unwrap().successful
}

fn load(store: &dyn TableStore) -> ResultTable {
    store.load().unwrap().expect("table should have been written")
}

#[tokio::test]
async fn test_full_run_to_csv() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, "results.csv", 0, 0);
    write_input(&config, &[JANE, GONE, JOHN]);

    let driver = driver();
    let successful = run_batch(&config, &driver, Box::new(CsvTableStore::new(&config.output.path))).await;
    assert_eq!(successful, 2);

    let table = load(&CsvTableStore::new(&config.output.path));
    assert_eq!(table.len(), 3);

    // Rows follow input order, the failed item included
    let urls: Vec<_> = table.rows().iter().map(|r| r.get(Column::ProfileUrl)).collect();
    assert_eq!(urls, vec![JANE, GONE, JOHN]);

    let jane = &table.rows()[0];
    assert_eq!(jane.get(Column::FirstName), "Jane");
    assert_eq!(jane.get(Column::LastName), "Doe");
    assert_eq!(jane.get(Column::Designation), "Staff Engineer at Acme");
    assert_eq!(jane.get(Column::City), "Austin");
    assert_eq!(jane.get(Column::Country), "United States");
    assert_eq!(jane.get(Column::Experience), "Staff Engineer at Acme");
    assert_eq!(jane.get(Column::CompanyName), "Acme Corp");
    assert_eq!(jane.get(Column::CompanyUrl), ACME);
    assert_eq!(jane.get(Column::CompanyWebsite), "https://acme.example/");
    assert_eq!(jane.get(Column::Variant), "profile");
    assert!(!jane.get(Column::ScrapedAt).is_empty());

    let gone = &table.rows()[1];
    assert!(gone.is_placeholder());
    assert!(gone.get(Column::FullName).starts_with("ERROR: "));
    assert_eq!(gone.get(Column::Variant), "profile");
    assert_eq!(gone.get(Column::Designation), "");
    assert_eq!(gone.get(Column::CompanyName), "");

    let john = &table.rows()[2];
    assert_eq!(john.get(Column::FullName), "John Smith");
    assert_eq!(john.get(Column::Designation), "VP Sales at Globex");
    assert_eq!(john.get(Column::Variant), "sales");
    assert_eq!(john.get(Column::CompanyName), "");

    // Every URL was visited, and the company detour returned to the profile
    let history = driver.history();
    let jane_at = history.iter().position(|u| u == JANE).unwrap();
    assert_eq!(history[jane_at + 1], ACME);
    assert_eq!(history[jane_at + 2], JANE);
    assert!(history.iter().any(|u| u == JOHN));
}

#[tokio::test]
async fn test_second_run_appends_to_sqlite() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, "results.db", 0, 0);
    let db = Path::new(&config.output.path);

    write_input(&config, &[JANE]);
    run_batch(&config, &driver(), open_store(db).unwrap()).await;

    write_input(&config, &[JOHN, GONE]);
    run_batch(&config, &driver(), open_store(db).unwrap()).await;

    let table = load(&SqliteTableStore::open(db).unwrap());
    let names: Vec<_> = table.rows().iter().map(|r| r.get(Column::FullName)).collect();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0], "Jane Doe");
    assert_eq!(names[1], "John Smith");
    assert!(names[2].starts_with("ERROR: "));

    let stats = table_statistics(&table);
    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.placeholder_rows, 1);
    assert_eq!(stats.rows_by_variant.get("profile"), Some(&2));
    assert_eq!(stats.rows_by_variant.get("sales"), Some(&1));
}

#[tokio::test]
async fn test_items_are_spaced_by_the_delay_window() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, "results.csv", 100, 150);
    // Sales pages have no company detour, so each item is one navigation
    let john_2 = "https://www.linkedin.com/sales/lead/ACw2,NAME_SEARCH";
    let john_3 = "https://www.linkedin.com/sales/lead/ACw3,NAME_SEARCH";
    write_input(&config, &[JOHN, john_2, john_3]);

    let driver = driver().with_page(john_2, JOHN_HTML).with_page(john_3, JOHN_HTML);
    let started = std::time::Instant::now();
    let successful = run_batch(&config, &driver, Box::new(CsvTableStore::new(&config.output.path))).await;
    let elapsed = started.elapsed();
    assert_eq!(successful, 3);

    // First navigation is the login page
    let times = driver.navigation_times();
    assert_eq!(times.len(), 4);
    for pair in times[1..].windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(100));
    }
    // Two pauses between three items, none after the last
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(150) * 3 + Duration::from_millis(500));
}

#[tokio::test]
async fn test_input_without_matching_column_uses_first_column() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, "results.csv", 0, 0);
    let mut file = std::fs::File::create(&config.input.path).unwrap();
    writeln!(file, "profile,notes").unwrap();
    writeln!(file, "\"  {}  \",first", JANE).unwrap();
    writeln!(file, "mailto:someone@example.com,skip me").unwrap();
    writeln!(file, ",empty").unwrap();
    writeln!(file, "\"{}\",last", JOHN).unwrap();

    let urls = load_targets(Path::new(&config.input.path), &config.input.url_column).unwrap();
    assert_eq!(urls, vec![JANE.to_string(), JOHN.to_string()]);
}

#[tokio::test]
async fn test_page_without_main_content_is_still_extracted() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, "results.csv", 0, 0);
    let slow = "https://www.linkedin.com/in/slow/";
    write_input(&config, &[slow]);

    let driver = driver().with_page(
        slow,
        r#"<html><body><div class="ph5"><h1 class="text-heading-xlarge">Slow Render</h1></div></body></html>"#,
    );
    let successful = run_batch(&config, &driver, Box::new(CsvTableStore::new(&config.output.path))).await;
    assert_eq!(successful, 1);

    let table = load(&CsvTableStore::new(&config.output.path));
    let row = &table.rows()[0];
    assert!(!row.is_placeholder());
    assert_eq!(row.get(Column::FullName), "Slow Render");
    assert_eq!(row.get(Column::ProfileUrl), slow);
}
