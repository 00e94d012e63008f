//! End-to-end catalog refresh against a mock review API.

use std::sync::Arc;

use pending_catalog::{
    CatalogCache, Pipeline, Request,
    models::{Config, Fetcher, IndexConfig},
    run,
    storage::{CatalogStorage, LocalStorage},
    utils::http::HttpClient,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECIPE_DIFF: &str = "\
diff --git a/recipes/weather-line b/recipes/weather-line
new file mode 100644
index 0000000..1111111
--- /dev/null
+++ b/recipes/weather-line
@@ -0,0 +1,3 @@
+(weather-line :fetcher github
+              :repo \"someone/weather-line\")
\\ No newline at end of file
";

const CODEBERG_DIFF: &str = "@@ -0,0 +1 @@\n+(tiny :fetcher codeberg :repo \"me/tiny\")\n";

const BROKEN_DIFF: &str = "@@ -0,0 +1 @@\n+(broken :fetcher github :repo\n";

async fn mount_diff(server: &MockServer, number: u32, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/o/r/pull/{number}.diff")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn pull(server: &MockServer, number: u32, body: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "html_url": format!("{}/o/r/pull/{number}", server.uri()),
        "diff_url": format!("{}/o/r/pull/{number}.diff", server.uri()),
        "issue_url": format!("{}/repos/o/r/issues/{number}", server.uri()),
        "created_at": "2025-02-03T04:05:06Z",
        "body": body,
    })
}

fn config_for(server: &MockServer) -> Config {
    Config {
        index: IndexConfig {
            api_base: server.uri(),
            web_base: "https://web.test".into(),
            repository: "o/r".into(),
            diff_host: String::new(),
            ..IndexConfig::default()
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn test_refresh_builds_and_persists_catalog() {
    let server = MockServer::start().await;

    let pulls = serde_json::json!([
        pull(&server, 1, Some("### Brief summary of what the package does\r\n\r\nShows the [weather](https://wttr.in) in the mode line.\r\n\r\n### Direct link\r\n")),
        pull(&server, 2, None),
        pull(&server, 3, Some("whatever")),
        { "number": 4, "title": "no diff here" },
    ]);

    Mock::given(method("GET"))
        .and(path("/repos/o/r/pulls"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
        .expect(1)
        .mount(&server)
        .await;

    mount_diff(&server, 1, RECIPE_DIFF).await;
    mount_diff(&server, 2, CODEBERG_DIFF).await;
    mount_diff(&server, 3, BROKEN_DIFF).await;

    let config = Arc::new(config_for(&server));
    let client = HttpClient::from_config(&config.http).unwrap();
    let pipeline = Pipeline::new(Arc::clone(&config), Arc::new(client));

    let tmp = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(tmp.path().join("catalog.json")));
    let cache = CatalogCache::init(storage.clone()).await;

    let catalog = run(Request::Refresh, &cache, &pipeline).await.unwrap();
    assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["tiny", "weather-line"]);

    let weather = &catalog["weather-line"];
    assert_eq!(weather.recipe.fetcher, Fetcher::Github);
    assert_eq!(weather.url, "https://www.github.com/someone/weather-line");
    assert_eq!(
        weather.description.to_plain(),
        "#1 Shows the weather in the mode line."
    );
    assert_eq!(
        weather.description.links().next().unwrap().target,
        "https://web.test/o/r/issues/1"
    );
    assert_eq!(weather.source.target, "https://web.test/o/r/pulls");
    assert!(weather.date.is_some());

    let tiny = &catalog["tiny"];
    assert_eq!(tiny.url, format!("{}/o/r/pull/2", server.uri()));
    assert_eq!(tiny.description.to_plain(), "#2 n/a");

    // Persisted snapshot matches what was served
    let snapshot = storage.load().await.unwrap().unwrap();
    assert_eq!(snapshot.entries, catalog);

    // A later list in a fresh process is served from disk
    let reopened = CatalogCache::init(storage).await;
    let listed = run(Request::List, &reopened, &pipeline).await.unwrap();
    assert_eq!(listed, catalog);
}

#[tokio::test]
async fn test_listing_failure_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = Arc::new(config_for(&server));
    let client = HttpClient::from_config(&config.http).unwrap();
    let pipeline = Pipeline::new(Arc::clone(&config), Arc::new(client));

    let tmp = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(tmp.path().join("catalog.json")));
    let cache = CatalogCache::init(storage.clone()).await;

    let result = run(Request::List, &cache, &pipeline).await;
    assert!(matches!(
        result,
        Err(pending_catalog::error::AppError::List(_))
    ));
    assert!(storage.load().await.unwrap().is_none());
}
