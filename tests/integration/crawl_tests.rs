//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the catalog API and run the
//! full category → list pages → product details cycle end-to-end.

use alkoteka_crawler::catalog::CanonicalRecord;
use alkoteka_crawler::config::{CategorySeed, Config};
use alkoteka_crawler::crawler::{run_crawl, Coordinator};
use alkoteka_crawler::output::validate_file;
use alkoteka_crawler::state::ChainEnd;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CITY: &str = "4a70f9e0-46ae-11e7-83ff-00155d026416";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.spider.base_url = base_url.to_string();
    config.crawler.download_delay = 0; // No politeness delay in tests
    config.crawler.max_concurrent_requests = 4;
    config.crawler.request_timeout = 5;
    config
}

fn seed(base_url: &str, slug: &str) -> CategorySeed {
    CategorySeed {
        url: format!("{}/catalog/{}", base_url, slug),
        slug: slug.to_string(),
    }
}

fn detail_body(uuid: &str, name: &str) -> Value {
    json!({
        "success": true,
        "results": {
            "uuid": uuid,
            "name": name,
            "slug": format!("{}-slug", uuid),
            "vendor_code": 1000,
            "price": 450,
            "prev_price": 500,
            "quantity_total": 3,
            "image_url": "https://alkoteka.com/img.png",
            "volume": "0.75 л",
            "category": {"name": "Красное", "parent": {"name": "Вино"}},
            "description": "Тестовый товар"
        }
    })
}

async fn mount_list_page(server: &MockServer, slug: &str, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/product"))
        .and(query_param("root_category_slug", slug))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, uuid: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/product/{}", uuid)))
        .and(query_param("city_uuid", CITY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn crawl_into_vec(
    config: &Config,
    seeds: &[CategorySeed],
) -> (alkoteka_crawler::CrawlStatistics, Vec<CanonicalRecord>) {
    let mut coordinator =
        Coordinator::new(config, Vec::new()).expect("Failed to create coordinator");
    let stats = coordinator.run(seeds).await.expect("Crawl failed");
    (stats, coordinator.into_sink())
}

#[tokio::test]
async fn test_two_page_category() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Seed page must carry the region cookie
    Mock::given(method("GET"))
        .and(path("/api/v1/product"))
        .and(query_param("root_category_slug", "vino"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "20"))
        .and(query_param("city_uuid", CITY))
        .and(header("cookie", "current_city_id=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "meta": {"current_page": 1, "last_page": 2},
            "results": [
                {"uuid": "p1", "name": "Вино 1"},
                {"name": "Без идентификатора"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_list_page(
        &mock_server,
        "vino",
        2,
        json!({
            "success": true,
            "meta": {"current_page": 2, "last_page": 2},
            "results": [{"uuid": "p2", "name": "Вино 2"}]
        }),
    )
    .await;

    mount_detail(&mock_server, "p1", detail_body("p1", "Вино 1")).await;
    mount_detail(&mock_server, "p2", detail_body("p2", "Вино 2")).await;

    let config = create_test_config(&base_url);
    let (stats, mut records) = crawl_into_vec(&config, &[seed(&base_url, "vino")]).await;

    assert_eq!(stats.categories_seeded, 1);
    assert_eq!(stats.list_pages, 2);
    assert_eq!(stats.detail_requests, 2);
    assert_eq!(stats.records, 2);
    assert_eq!(stats.skipped_items, 1);
    assert_eq!(stats.chains_ended_by(ChainEnd::LastPage), 1);
    assert_eq!(stats.total_failures(), 0);

    records.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(records[0].title, "Вино 1, 0.75 л");
    assert_eq!(records[0].url, format!("{}/product/p1-slug", base_url));
    assert_eq!(records[0].section, vec!["Вино", "Красное"]);
    assert_eq!(records[0].price_data.sale_tag, "Скидка 10%");
    assert_eq!(records[0].stock.count, 3);
    assert!(records[0].stock.in_stock);
    assert_eq!(records[0].rpc, "1000");
}

#[tokio::test]
async fn test_failed_detail_is_dropped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_list_page(
        &mock_server,
        "pivo",
        1,
        json!({
            "success": true,
            "meta": {"current_page": 1, "last_page": 1},
            "results": [{"uuid": "ok"}, {"uuid": "bad"}, {"uuid": "gone"}]
        }),
    )
    .await;

    mount_detail(&mock_server, "ok", detail_body("ok", "Пиво")).await;
    mount_detail(
        &mock_server,
        "bad",
        json!({"success": false, "message": "not available"}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/product/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let (stats, records) = crawl_into_vec(&config, &[seed(&base_url, "pivo")]).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Пиво, 0.75 л");
    assert_eq!(stats.detail_requests, 3);
    assert_eq!(stats.business_failures, 1);
    assert_eq!(stats.transport_failures, 1);
    assert_eq!(stats.chains_ended_by(ChainEnd::LastPage), 1);
}

#[tokio::test]
async fn test_item_limit_stops_pagination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_list_page(
        &mock_server,
        "vodka",
        1,
        json!({
            "success": true,
            "meta": {"current_page": 1, "last_page": 5},
            "results": [{"uuid": "v1"}]
        }),
    )
    .await;

    // Never requested: the item limit allows one page only
    Mock::given(method("GET"))
        .and(path("/api/v1/product"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_detail(&mock_server, "v1", detail_body("v1", "Водка")).await;

    let mut config = create_test_config(&base_url);
    config.spider.item_limit = 20;

    let (stats, records) = crawl_into_vec(&config, &[seed(&base_url, "vodka")]).await;

    assert_eq!(records.len(), 1);
    assert_eq!(stats.list_pages, 1);
    assert_eq!(stats.chains_ended_by(ChainEnd::PageLimit), 1);
}

#[tokio::test]
async fn test_broken_category_does_not_affect_others() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/api/v1/product"))
        .and(query_param("root_category_slug", "broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/product"))
        .and(query_param("root_category_slug", "refused"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_list_page(
        &mock_server,
        "shampanskoe",
        1,
        json!({
            "success": true,
            "results": {
                "products": [{"uuid": "s1"}],
                "total_pages": 1
            }
        }),
    )
    .await;
    mount_detail(&mock_server, "s1", detail_body("s1", "Шампанское")).await;

    let config = create_test_config(&base_url);
    let seeds = [
        seed(&base_url, "broken"),
        seed(&base_url, "refused"),
        seed(&base_url, "shampanskoe"),
    ];
    let (stats, records) = crawl_into_vec(&config, &seeds).await;

    assert_eq!(records.len(), 1);
    assert_eq!(stats.categories_seeded, 3);
    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.business_failures, 1);
    assert_eq!(stats.chains_ended_by(ChainEnd::Decode), 1);
    assert_eq!(stats.chains_ended_by(ChainEnd::Business), 1);
    assert_eq!(stats.chains_ended_by(ChainEnd::LastPage), 1);
}

#[tokio::test]
async fn test_run_crawl_writes_valid_result_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().expect("Failed to create temp dir");

    let categories_path = dir.path().join("categories.txt");
    let mut categories = std::fs::File::create(&categories_path).unwrap();
    writeln!(categories, "/catalog/vino\n\n{}/catalog/konyak/", base_url).unwrap();
    drop(categories);

    mount_list_page(
        &mock_server,
        "vino",
        1,
        json!({"success": true, "results": [{"uuid": "w1"}], "meta": {"total": 1, "per_page": 20}}),
    )
    .await;
    mount_list_page(
        &mock_server,
        "konyak",
        1,
        json!({"success": true, "results": [{"uuid": "k1"}, {"uuid": "k2"}]}),
    )
    .await;
    mount_detail(&mock_server, "w1", detail_body("w1", "Вино")).await;
    mount_detail(&mock_server, "k1", detail_body("k1", "Коньяк")).await;
    mount_detail(&mock_server, "k2", detail_body("k2", "Коньяк XO")).await;

    let mut config = create_test_config(&base_url);
    config.spider.categories_file = categories_path;
    config.output.result_path = dir.path().join("out").join("result.json");

    let stats = run_crawl(&config).await.expect("Crawl failed");
    assert_eq!(stats.categories_seeded, 2);
    assert_eq!(stats.records, 3);

    let report = validate_file(&config.output.result_path).expect("Result file invalid");
    assert_eq!(report.records, 3);

    let text = std::fs::read_to_string(&config.output.result_path).unwrap();
    assert!(text.contains("Коньяк XO"));
}

#[tokio::test]
async fn test_empty_category_file_writes_empty_array() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().expect("Failed to create temp dir");

    let categories_path = dir.path().join("categories.txt");
    std::fs::write(&categories_path, "\n\n").unwrap();

    let mut config = create_test_config(&mock_server.uri());
    config.spider.categories_file = categories_path;
    config.output.result_path = dir.path().join("result.json");

    let stats = run_crawl(&config).await.expect("Crawl failed");
    assert_eq!(stats.categories_seeded, 0);

    let report = validate_file(&config.output.result_path).unwrap();
    assert!(report.is_empty());
}
