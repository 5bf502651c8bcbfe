use crate::{create_test_config, mount_listing, mount_page, read_csv_rows};
use church_harvest::harvest::{harvest, RegionOutcome, RegionPipeline, Runner};
use church_harvest::regions::{region_by_id, select_regions};
use church_harvest::storage::{checkpoint_path, csv_path, list_cache_path};
use church_harvest::HarvestError;
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_region_with_failing_record() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        8,
        json!([
            {"id": 1, "shortname": "tyst", "title": "Tysta kyrkan"},
            {"id": 2, "shortname": "domkyrkan", "title": "Domkyrkan"},
            {"id": 3, "title": "Betaniakyrkan"}
        ]),
        1,
    )
    .await;

    // Always slower than the 300ms request timeout: three attempts, no row
    Mock::given(method("GET"))
        .and(path("/tyst"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late@kyrkan.se")
                .set_delay(Duration::from_secs(2)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/domkyrkan",
        r#"<p>Expedition: <a href="mailto:exp@domkyrkan.se">exp@domkyrkan.se</a></p>
           <p>Kyrkoherde: kyrkoherde@domkyrkan.se</p>
           <img src="data:image/png;base64,iVBORw0KGgoAAAANSUhEUg@fake.io">"#,
        1,
    )
    .await;

    mount_page(&mock_server, "/church/3", "<p>Inga kontaktuppgifter</p>", 1).await;

    let config = create_test_config(&base_url, dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    let region = region_by_id(8).unwrap();

    let outcome = pipeline.run(region).await.expect("Region failed");
    assert_eq!(
        outcome,
        RegionOutcome::Completed {
            records: 3,
            rows_written: 2,
            records_failed: 1,
        }
    );

    let rows = read_csv_rows(&csv_path(dir.path(), 8));
    assert_eq!(rows.len(), 2);

    assert_eq!(
        rows[0],
        vec![
            "Kalmar län".to_string(),
            "Domkyrkan".to_string(),
            format!("{}/domkyrkan", base_url),
            "exp@domkyrkan.se".to_string(),
            "kyrkoherde@domkyrkan.se".to_string(),
        ]
    );
    assert_eq!(
        rows[1],
        vec![
            "Kalmar län".to_string(),
            "Betaniakyrkan".to_string(),
            format!("{}/church/3", base_url),
        ]
    );

    assert!(checkpoint_path(dir.path(), 8).exists());
    assert!(list_cache_path(dir.path(), 8).exists());
}

#[tokio::test]
async fn test_checkpointed_region_is_skipped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    std::fs::write(checkpoint_path(dir.path(), 2), "").unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();

    let outcome = pipeline.run(region_by_id(2).unwrap()).await.unwrap();

    assert_eq!(outcome, RegionOutcome::Skipped);
    assert!(!csv_path(dir.path(), 2).exists());
}

#[tokio::test]
async fn test_completed_csv_is_not_rewritten() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    std::fs::write(checkpoint_path(dir.path(), 2), "").unwrap();
    std::fs::write(csv_path(dir.path(), 2), "\"finished\"\n").unwrap();

    let config = create_test_config(&mock_server.uri(), dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    pipeline.run(region_by_id(2).unwrap()).await.unwrap();

    let content = std::fs::read_to_string(csv_path(dir.path(), 2)).unwrap();
    assert_eq!(content, "\"finished\"\n");
}

#[tokio::test]
async fn test_aborted_region_leaves_no_checkpoint() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        12,
        json!([
            {"id": 1, "shortname": "forst", "title": "Första"},
            {"id": 2, "shortname": "andra", "title": "Andra"},
            {"id": 3, "shortname": "hanger", "title": "Tredje"}
        ]),
        1,
    )
    .await;
    mount_page(&mock_server, "/forst", "a@forst.se", 1).await;
    mount_page(&mock_server, "/andra", "b@andra.se", 1).await;
    Mock::given(method("GET"))
        .and(path("/hanger"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvest.request_timeout_ms = 20_000;
    let pipeline = RegionPipeline::from_config(&config).unwrap();

    // Kill the region while the third record is in flight
    let result = tokio::time::timeout(
        Duration::from_millis(1500),
        pipeline.run(region_by_id(12).unwrap()),
    )
    .await;
    assert!(result.is_err(), "pipeline should still be running");

    let rows = read_csv_rows(&csv_path(dir.path(), 12));
    assert_eq!(rows.len(), 2);
    assert!(!checkpoint_path(dir.path(), 12).exists());
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        1,
        json!([{"id": 77, "shortname": "ostkyrkan", "title": "Östkyrkan"}]),
        1,
    )
    .await;

    // Two failures, then the real page
    Mock::given(method("GET"))
        .and(path("/ostkyrkan"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ostkyrkan", "info@ostkyrkan.se", 1).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    let outcome = pipeline.run(region_by_id(1).unwrap()).await.unwrap();

    assert_eq!(
        outcome,
        RegionOutcome::Completed {
            records: 1,
            rows_written: 1,
            records_failed: 0,
        }
    );

    let rows = read_csv_rows(&csv_path(dir.path(), 1));
    assert_eq!(rows[0][3], "info@ostkyrkan.se");
}

#[tokio::test]
async fn test_error_status_exhausts_attempts() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        3,
        json!([{"id": 5, "shortname": "borta", "title": "Borta"}]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/borta"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    let outcome = pipeline.run(region_by_id(3).unwrap()).await.unwrap();

    assert_eq!(
        outcome,
        RegionOutcome::Completed {
            records: 1,
            rows_written: 0,
            records_failed: 1,
        }
    );
    assert!(read_csv_rows(&csv_path(dir.path(), 3)).is_empty());
    assert!(checkpoint_path(dir.path(), 3).exists());
}

#[tokio::test]
async fn test_concurrent_chunks_write_every_row() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let listing: Vec<serde_json::Value> = (1..=5)
        .map(|i| json!({"id": i, "shortname": format!("kyrka{}", i), "title": format!("Kyrka {}", i)}))
        .collect();
    mount_listing(&mock_server, 14, json!(listing), 1).await;

    // A slow first page lets the other chunks overtake the first one
    Mock::given(method("GET"))
        .and(path("/kyrka1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("kontakt1@kyrka.se")
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    for i in 2..=5 {
        mount_page(
            &mock_server,
            &format!("/kyrka{}", i),
            &format!("kontakt{}@kyrka.se", i),
            1,
        )
        .await;
    }

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvest.concurrency = 3;
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    pipeline.run(region_by_id(14).unwrap()).await.unwrap();

    let emails: Vec<String> = read_csv_rows(&csv_path(dir.path(), 14))
        .into_iter()
        .map(|row| row[3].clone())
        .collect();
    let unique: HashSet<&String> = emails.iter().collect();
    assert_eq!(emails.len(), 5);
    assert_eq!(unique.len(), 5);

    // Chunks of two: [1, 2], [3, 4], [5]; each chunk runs in list order
    let position = |i: usize| {
        emails
            .iter()
            .position(|email| *email == format!("kontakt{}@kyrka.se", i))
            .unwrap()
    };
    assert!(position(1) < position(2));
    assert!(position(3) < position(4));
}

#[tokio::test]
async fn test_listing_failure_stops_the_run() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Region 1 finished earlier, region 2's listing is down
    std::fs::write(checkpoint_path(dir.path(), 1), "").unwrap();
    Mock::given(method("POST"))
        .and(query_param("ids", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(query_param("ids", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvest.regions = Some(vec![1, 2, 3]);

    let result = harvest(config).await;

    assert!(result.is_err());
    assert!(!checkpoint_path(dir.path(), 2).exists());
    assert!(!csv_path(dir.path(), 2).exists());
    assert!(!checkpoint_path(dir.path(), 3).exists());
}

#[tokio::test]
async fn test_rerun_resumes_without_network() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        6,
        json!([{"id": 1, "shortname": "storsjon", "title": "Storsjökyrkan"}]),
        1,
    )
    .await;
    mount_page(&mock_server, "/storsjon", "hej@storsjon.se", 1).await;
    mount_listing(&mock_server, 7, json!([]), 1).await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvest.regions = Some(vec![7, 6]);

    let first = harvest(config.clone()).await.unwrap();
    assert_eq!(first.regions_completed, 2);
    assert_eq!(first.rows_written, 1);

    // Every region is checkpointed; the mocks' expect(1) catch extra calls
    let second = harvest(config).await.unwrap();
    assert_eq!(second.regions_completed, 0);
    assert_eq!(second.regions_skipped, 2);

    let rows = read_csv_rows(&csv_path(dir.path(), 6));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "Jämtlands län");

    // Empty region still gets an (empty) CSV and a checkpoint
    assert!(read_csv_rows(&csv_path(dir.path(), 7)).is_empty());
    assert!(checkpoint_path(dir.path(), 7).exists());
}

#[tokio::test]
async fn test_runner_uses_cached_list_after_failed_region() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // A previous run cached the list but died before finishing the region
    std::fs::write(
        list_cache_path(dir.path(), 4),
        r#"[{"id": 9, "shortname": "gavle", "title": "Gävle kyrka"}]"#,
    )
    .unwrap();
    std::fs::write(csv_path(dir.path(), 4), "\"partial\"\n").unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/gavle", "kansli@gavle.se", 1).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    let runner = Runner::new(pipeline, select_regions(Some(&[4][..])));

    let summary = runner.run().await.unwrap();
    assert_eq!(summary.regions_completed, 1);

    let rows = read_csv_rows(&csv_path(dir.path(), 4));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Gävle kyrka");
    assert_eq!(rows[0][3], "kansli@gavle.se");
}

#[tokio::test]
async fn test_slow_listing_is_not_cut_by_page_timeout() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Slower than the 300ms page timeout, well inside the listing timeout
    Mock::given(method("POST"))
        .and(path("/api/filter"))
        .and(query_param("ids", "19"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "shortname": "skara", "title": "Skara domkyrka"}]))
                .set_delay(Duration::from_millis(1200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/skara", "pastorsexp@skara.se", 1).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    let outcome = pipeline.run(region_by_id(19).unwrap()).await.unwrap();

    assert_eq!(
        outcome,
        RegionOutcome::Completed {
            records: 1,
            rows_written: 1,
            records_failed: 0,
        }
    );
    assert!(list_cache_path(dir.path(), 19).exists());
}

#[tokio::test]
async fn test_listing_timeout_fails_the_region() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvest.listing_timeout_ms = 500;
    let pipeline = RegionPipeline::from_config(&config).unwrap();

    let result = pipeline.run(region_by_id(19).unwrap()).await;
    assert!(matches!(result, Err(HarvestError::Http { .. })));
    assert!(!list_cache_path(dir.path(), 19).exists());
    assert!(!checkpoint_path(dir.path(), 19).exists());
}

#[tokio::test]
async fn test_loose_listing_records_are_harvested() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        4,
        json!([
            {"id": 1, "shortname": "hudik", "title": "Hudiksvalls kyrka"},
            {"id": 2, "shortname": "namnlos", "title": null},
            {"id": "17", "title": "Sjömanskyrkan"}
        ]),
        1,
    )
    .await;
    mount_page(&mock_server, "/hudik", "info@hudik.se", 1).await;
    mount_page(&mock_server, "/namnlos", "kontakt@namnlos.se", 1).await;
    mount_page(&mock_server, "/church/17", "sjoman@kyrkan.se", 1).await;

    let config = create_test_config(&base_url, dir.path());
    let pipeline = RegionPipeline::from_config(&config).unwrap();
    let outcome = pipeline.run(region_by_id(4).unwrap()).await.unwrap();

    assert_eq!(
        outcome,
        RegionOutcome::Completed {
            records: 3,
            rows_written: 3,
            records_failed: 0,
        }
    );

    let rows = read_csv_rows(&csv_path(dir.path(), 4));
    assert_eq!(rows[1][1], "");
    assert_eq!(rows[1][3], "kontakt@namnlos.se");
    assert_eq!(rows[2][2], format!("{}/church/17", base_url));
    assert_eq!(rows[2][3], "sjoman@kyrkan.se");
}
