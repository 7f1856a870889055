//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve a small quote listing and test
//! the full harvest cycle end-to-end against a SQLite file.

use quote_harvester::config::{
    parse_config, Config, FetchConfig, FetchMode, SourceConfig, StagingConfig, StoreConfig,
    UserAgentConfig,
};
use quote_harvester::crawler::Coordinator;
use quote_harvester::storage::{open_store, RunStatus, Store};
use quote_harvester::HarvestError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration harvesting `seed` into `db_path`
fn create_test_config(seed: &str, db_path: &Path, mode: FetchMode) -> Config {
    Config {
        source: SourceConfig {
            seed_url: seed.to_string(),
            max_pages: None,
        },
        fetch: FetchConfig {
            mode,
            max_in_flight: 4,
            timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        store: StoreConfig {
            database_path: db_path.display().to_string(),
        },
        staging: None,
    }
}

fn quote(text: &str, author: &str, tags: &[&str]) -> String {
    let tags: String = tags
        .iter()
        .map(|tag| format!(r#"<a class="tag" href="/tag/{0}/page/1/">{0}</a> "#, tag))
        .collect();
    format!(
        r#"<div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
    <span class="text" itemprop="text">{}</span>
    <span>by <small class="author" itemprop="author">{}</small>
    <a href="/author/{}">(about)</a></span>
    <div class="tags">Tags: {}</div>
</div>"#,
        text,
        author,
        author.replace(' ', "-"),
        tags
    )
}

fn listing(quotes: &[String], next: Option<&str>) -> String {
    let pager = match next {
        Some(href) => format!(
            r#"<nav><ul class="pager"><li class="next"><a href="{}">Next <span aria-hidden="true">&rarr;</span></a></li></ul></nav>"#,
            href
        ),
        None => String::new(),
    };
    format!(
        r#"<html><head><title>Quotes to Scrape</title></head><body><div class="container">
<div class="row"><div class="col-md-8">{}{}</div></div></div></body></html>"#,
        quotes.concat(),
        pager
    )
}

fn profile(full_name: &str, born_date: &str, born_location: &str, bio: &str) -> String {
    format!(
        r#"<html><head><title>Quotes to Scrape</title></head><body><div class="author-details">
    <h3 class="author-title">{}
    </h3>
    <p><strong>Born:</strong> <span class="author-born-date">{}</span>
    <span class="author-born-location">{}</span></p>
    <strong>Description:</strong>
    <div class="author-description">
        {}
    </div>
</div></body></html>"#,
        full_name, born_date, born_location, bio
    )
}

/// Mounts a GET route answering 200 with `body`, expected `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Three listing pages; Einstein is quoted on pages 1 and 3
async fn mount_three_page_site(server: &MockServer, runs: u64) {
    mount_page(
        server,
        "/",
        listing(
            &[
                quote(
                    "“The world as we have created it is a process of our thinking.”",
                    "Albert Einstein",
                    &["change", "deep-thoughts", "thinking", "world"],
                ),
                quote(
                    "“It is our choices, Harry, that show what we truly are.”",
                    "J.K. Rowling",
                    &["abilities", "choices"],
                ),
            ],
            Some("/page/2/"),
        ),
        runs,
    )
    .await;
    mount_page(
        server,
        "/page/2/",
        listing(
            &[quote(
                "“A day without sunshine is like, you know, night.”",
                "Steve Martin",
                &["humor", "obvious", "simile"],
            )],
            Some("/page/3/"),
        ),
        runs,
    )
    .await;
    mount_page(
        server,
        "/page/3/",
        listing(
            &[quote(
                "“Try not to become a man of success. Rather become a man of value.”",
                "Albert Einstein",
                &["adulthood", "success", "value"],
            )],
            None,
        ),
        runs,
    )
    .await;

    mount_page(
        server,
        "/author/Albert-Einstein",
        profile(
            "Albert Einstein",
            "March 14, 1879",
            "in Ulm, Germany",
            "In 1879, Albert Einstein was born in Ulm, Germany.",
        ),
        runs,
    )
    .await;
    mount_page(
        server,
        "/author/J.K.-Rowling",
        profile(
            "J.K. Rowling",
            "July 31, 1965",
            "in Yate, South Gloucestershire, England, The United Kingdom",
            "See also: Robert Galbraith",
        ),
        runs,
    )
    .await;
    mount_page(
        server,
        "/author/Steve-Martin",
        profile(
            "Steve Martin",
            "August 14, 1945",
            "in Waco, Texas, The United States",
            "Stephen Glenn \"Steve\" Martin is an American actor.",
        ),
        runs,
    )
    .await;
}

fn temp_db() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("quotes.db");
    (dir, db_path)
}

#[tokio::test]
async fn test_full_harvest_three_pages() {
    let server = MockServer::start().await;
    mount_three_page_site(&server, 1).await;
    let (_dir, db_path) = temp_db();

    let config = create_test_config(&server.uri(), &db_path, FetchMode::Concurrent);
    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Harvest failed");

    assert_eq!(report.pages, 3);
    assert_eq!(report.quotes_extracted, 4);
    assert_eq!(report.author_references, 4);
    assert_eq!(report.unique_authors, 3);
    assert_eq!(report.authors_inserted, 3);
    assert_eq!(report.quotes_inserted, 4);
    assert_eq!(report.quotes_dropped(), 0);

    // Quotes are stored in crawl order with tags in markup order
    let store = coordinator.store();
    let quotes = store.list_quotes().expect("Failed to list quotes");
    let authors: Vec<&str> = quotes.iter().map(|q| q.author_name.as_str()).collect();
    assert_eq!(
        authors,
        vec!["Albert Einstein", "J.K. Rowling", "Steve Martin", "Albert Einstein"]
    );
    assert_eq!(
        quotes[0].tags,
        vec!["change", "deep-thoughts", "thinking", "world"]
    );

    let einstein = store
        .find_author("Albert Einstein")
        .expect("Failed to find author")
        .expect("Einstein not stored");
    assert_eq!(einstein.born_date, "March 14, 1879");
    assert_eq!(einstein.born_location, "in Ulm, Germany");
    assert_eq!(
        einstein.description,
        "In 1879, Albert Einstein was born in Ulm, Germany."
    );
    assert_eq!(quotes[3].author_id, einstein.id);
}

#[tokio::test]
async fn test_sequential_mode_matches_concurrent() {
    let mut stored = Vec::new();

    for mode in [FetchMode::Sequential, FetchMode::Concurrent] {
        let server = MockServer::start().await;
        mount_three_page_site(&server, 1).await;
        let (_dir, db_path) = temp_db();

        let config = create_test_config(&server.uri(), &db_path, mode);
        let mut coordinator =
            Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
        coordinator.run().await.expect("Harvest failed");

        let authors: Vec<String> = coordinator
            .store()
            .list_authors()
            .expect("Failed to list authors")
            .into_iter()
            .map(|a| a.full_name)
            .collect();
        let quotes: Vec<(String, Vec<String>)> = coordinator
            .store()
            .list_quotes()
            .expect("Failed to list quotes")
            .into_iter()
            .map(|q| (q.text, q.tags))
            .collect();
        stored.push((authors, quotes));
    }

    assert_eq!(stored[0], stored[1]);
}

#[tokio::test]
async fn test_second_run_changes_nothing() {
    let server = MockServer::start().await;
    mount_three_page_site(&server, 2).await;
    let (_dir, db_path) = temp_db();

    let config = create_test_config(&server.uri(), &db_path, FetchMode::Concurrent);
    let mut first = Coordinator::new(config.clone(), "hash".to_string())
        .expect("Failed to create coordinator");
    first.run().await.expect("First harvest failed");
    let before = first.store().list_quotes().expect("Failed to list quotes");
    drop(first);

    let mut second =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let report = second.run().await.expect("Second harvest failed");

    assert_eq!(report.authors_inserted, 0);
    assert_eq!(report.authors_skipped, 3);
    assert_eq!(report.quotes_inserted, 0);
    assert_eq!(report.quotes_skipped, 4);
    assert_eq!(second.store().count_authors().expect("Failed to count"), 3);
    assert_eq!(
        second.store().list_quotes().expect("Failed to list quotes"),
        before
    );
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[], None)))
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, db_path) = temp_db();

    let config = create_test_config(&server.uri(), &db_path, FetchMode::Sequential);
    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Harvest failed");

    assert_eq!(report.pages, 1);
    assert_eq!(report.quotes_extracted, 0);
}

#[tokio::test]
async fn test_server_error_aborts_run() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        listing(
            &[quote("“q1”", "Albert Einstein", &[])],
            Some("/page/2/"),
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    // The walk fails before any profile is requested
    mount_page(
        &server,
        "/author/Albert-Einstein",
        profile("Albert Einstein", "March 14, 1879", "in Ulm, Germany", "Bio"),
        0,
    )
    .await;
    let (_dir, db_path) = temp_db();

    let config = create_test_config(&server.uri(), &db_path, FetchMode::Concurrent);
    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let result = coordinator.run().await;

    assert!(matches!(result, Err(HarvestError::Transport(_))));
    drop(coordinator);

    let store = open_store(&db_path).expect("Failed to open DB");
    let run = store
        .get_latest_run()
        .expect("Failed to load run")
        .expect("Run not recorded");
    assert_eq!(run.status, RunStatus::Failed);
    assert!(run.error_message.expect("No error message").contains("500"));
    assert_eq!(store.count_authors().expect("Failed to count"), 0);
    assert_eq!(store.count_quotes().expect("Failed to count"), 0);
}

#[tokio::test]
async fn test_missing_author_title_aborts_run() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        listing(&[quote("“q1”", "Albert Einstein", &[])], None),
        1,
    )
    .await;
    mount_page(
        &server,
        "/author/Albert-Einstein",
        "<html><body><p>Not found</p></body></html>".to_string(),
        1,
    )
    .await;
    let (_dir, db_path) = temp_db();

    let config = create_test_config(&server.uri(), &db_path, FetchMode::Sequential);
    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let result = coordinator.run().await;

    assert!(matches!(result, Err(HarvestError::Structure(_))));
}

#[tokio::test]
async fn test_quote_with_unmatched_author_is_dropped() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        listing(
            &[
                quote("“q1”", "Jane Austen", &["books"]),
                quote("“q2”", "Mark Twain", &["humor"]),
            ],
            None,
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/author/Jane-Austen",
        profile("Jane Austen", "December 16, 1775", "in Steventon Rectory, Hampshire, The United Kingdom", "Novelist"),
        1,
    )
    .await;
    // Profile title spelled differently from the listing
    mount_page(
        &server,
        "/author/Mark-Twain",
        profile("Samuel Clemens", "November 30, 1835", "in Florida, Missouri, The United States", "Humorist"),
        1,
    )
    .await;
    let (_dir, db_path) = temp_db();

    let config = create_test_config(&server.uri(), &db_path, FetchMode::Concurrent);
    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Harvest failed");

    assert_eq!(report.authors_inserted, 2);
    assert_eq!(report.quotes_inserted, 1);
    assert_eq!(report.quotes_unlinked, 1);

    let store = coordinator.store();
    assert!(store.find_quote("“q1”").expect("Failed to find").is_some());
    assert!(store.find_quote("“q2”").expect("Failed to find").is_none());
    assert!(store
        .find_author("Samuel Clemens")
        .expect("Failed to find")
        .is_some());
}

#[tokio::test]
async fn test_max_pages_stops_walk() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        listing(&[quote("“q1”", "Albert Einstein", &[])], Some("/page/2/")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/page/2/",
        listing(&[quote("“q2”", "Albert Einstein", &[])], None),
        0,
    )
    .await;
    mount_page(
        &server,
        "/author/Albert-Einstein",
        profile("Albert Einstein", "March 14, 1879", "in Ulm, Germany", "Bio"),
        1,
    )
    .await;
    let (_dir, db_path) = temp_db();

    let mut config = create_test_config(&server.uri(), &db_path, FetchMode::Concurrent);
    config.source.max_pages = Some(1);
    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Harvest failed");

    assert_eq!(report.pages, 1);
    assert_eq!(report.quotes_inserted, 1);
}

#[tokio::test]
async fn test_staging_files_written() {
    let server = MockServer::start().await;
    mount_three_page_site(&server, 1).await;
    let (dir, db_path) = temp_db();
    let authors_path = dir.path().join("authors.json");
    let quotes_path = dir.path().join("quotes.json");

    let mut config = create_test_config(&server.uri(), &db_path, FetchMode::Concurrent);
    config.staging = Some(StagingConfig {
        authors_path: authors_path.display().to_string(),
        quotes_path: quotes_path.display().to_string(),
    });
    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    let quotes = std::fs::read_to_string(&quotes_path).expect("Quotes file missing");
    assert!(quotes.contains("“A day without sunshine is like, you know, night.”"));
    let authors = std::fs::read_to_string(&authors_path).expect("Authors file missing");
    assert!(authors.contains("\"full_name\": \"Steve Martin\""));
}

#[tokio::test]
async fn test_harvest_from_toml_config() {
    let server = MockServer::start().await;
    mount_three_page_site(&server, 1).await;
    let (_dir, db_path) = temp_db();

    let toml = format!(
        r#"
[source]
seed-url = "{}"

[fetch]
mode = "sequential"

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[store]
database-path = "{}"
"#,
        server.uri(),
        db_path.display()
    );
    let config = parse_config(&toml).expect("Failed to parse config");

    let mut coordinator =
        Coordinator::new(config, "hash".to_string()).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Harvest failed");

    assert_eq!(report.quotes_inserted, 4);
}
