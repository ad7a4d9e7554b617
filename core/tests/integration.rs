//! Full client round trips against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives it with the default
//! `reqwest`-backed client, so query encoding, multipart uploads, status
//! classification and response validation are exercised over real HTTP.

use std::time::{Duration, Instant};

use sabnzbd_core::{
    AddOptions, ApiError, Call, ClientConfig, HistoryQuery, Priority, QueueQuery, SabnzbdClient,
    SortDirection, SortField, TransportError, Upload,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

async fn client() -> SabnzbdClient {
    let host = start_server().await;
    SabnzbdClient::new(&host, mock_server::DEFAULT_API_KEY).unwrap()
}

#[tokio::test]
async fn version_and_auth() {
    let c = client().await;
    assert_eq!(c.version().await.unwrap(), mock_server::VERSION);
    assert_eq!(c.auth().await.unwrap(), "apikey");
}

#[tokio::test]
async fn wrong_key_is_rejected() {
    let host = start_server().await;
    let c = SabnzbdClient::new(&host, "wrong").unwrap();
    let err = c.queue(&QueueQuery::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(ref m) if m == "API Key Incorrect"));
}

#[tokio::test]
async fn queue_lifecycle() {
    let c = client().await;

    // Step 1: empty queue.
    let queue = c.queue(&QueueQuery::default()).await.unwrap();
    assert!(queue.slots.is_empty());
    assert_eq!(queue.status, "Idle");

    // Step 2: add by URL, by server path and by upload.
    let options = AddOptions {
        category: Some("tv".to_string()),
        priority: Some(Priority::High),
        ..Default::default()
    };
    let by_url = c
        .add_url("http://indexer.test/get/Alpha.Show.nzb?id=1&r=x y", &options)
        .await
        .unwrap();
    let by_path = c
        .add_local_file("/nzb/Beta.Show.nzb", &AddOptions::default())
        .await
        .unwrap();
    let upload = Upload::new("Gamma.Show.nzb", b"<nzb/>".to_vec());
    let by_upload = c
        .add_file(
            upload,
            &AddOptions {
                name: Some("Gamma.Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((by_url.len(), by_path.len(), by_upload.len()), (1, 1, 1));

    // Step 3: list, filtered by category.
    let queue = c
        .queue(&QueueQuery {
            category: Some("tv".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(queue.slots.len(), 1);
    assert_eq!(queue.slots[0].nzo_id, by_url[0]);
    assert_eq!(queue.slots[0].priority, "High");

    // Step 4: sort by name descending.
    assert!(c
        .sort_queue(SortField::Name, SortDirection::Descending)
        .await
        .unwrap());
    let queue = c.queue(&QueueQuery::default()).await.unwrap();
    let names: Vec<&str> = queue.slots.iter().map(|s| s.filename.as_str()).collect();
    assert_eq!(names, ["Gamma.Renamed", "Beta.Show", "Alpha.Show"]);

    // Step 5: job mutations.
    assert!(c.change_category(&by_path[0], "movies").await.unwrap());
    assert!(c.rename_job(&by_path[0], "Beta.Renamed", None).await.unwrap());
    assert!(c.pause_jobs(&[by_path[0].as_str(), by_upload[0].as_str()]).await.unwrap());
    let position = c.set_job_priority(&by_url[0], Priority::Force).await.unwrap();
    assert_eq!(position, 0);
    let files = c.job_files(&by_path[0]).await.unwrap();
    assert_eq!(files[0].filename, "Beta.Renamed.part01.rar");

    let queue = c
        .queue(&QueueQuery {
            nzo_ids: vec![by_path[0].clone()],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(queue.slots[0].cat, "movies");
    assert_eq!(queue.slots[0].status, "Paused");

    // Step 6: switch and delete with a comma-joined id list.
    let result = c.switch_jobs(&by_upload[0], "0").await.unwrap();
    assert_eq!(result.position, 0);
    let removed = c
        .delete_jobs(&[by_url[0].as_str(), by_path[0].as_str()], false)
        .await
        .unwrap();
    assert_eq!(removed.len(), 2);

    // Step 7: purge the rest.
    let purged = c.purge_queue(None, true).await.unwrap();
    assert_eq!(purged, by_upload);
    assert!(c.queue(&QueueQuery::default()).await.unwrap().slots.is_empty());
}

#[tokio::test]
async fn history_retry_and_delete() {
    let c = client().await;

    let failed = c
        .history(&HistoryQuery {
            failed_only: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(failed.slots.len(), 1);
    let id = failed.slots[0].nzo_id.clone();

    let upload = Upload::new("replacement.nzb", b"<nzb/>".to_vec());
    assert!(c.retry_with_file(&id, upload, None).await.unwrap());
    let queue = c.queue(&QueueQuery::default()).await.unwrap();
    assert_eq!(queue.slots[0].nzo_id, id);

    // Retrying again finds nothing to retry.
    assert!(!c.retry(&id, None).await.unwrap());

    assert!(c.delete_all_history(false).await.unwrap());
    let history = c.history(&HistoryQuery::default()).await.unwrap();
    assert!(history.slots.is_empty());
}

#[tokio::test]
async fn server_stats_projection() {
    let c = client().await;
    let stats = c.server_stats().await.unwrap();
    assert_eq!(stats.servers.len(), 2);
    let alpha = &stats.servers["news.alpha.test"];
    assert_eq!(alpha.daily.len(), 3);
    assert_eq!(alpha.daily["2024-05-02"], 500_000);
    assert_eq!(alpha.articles_tried["2024-05-01"], 1500);
    assert_eq!(alpha.articles_success, alpha.articles_tried);
}

#[tokio::test]
async fn warnings_categories_scripts_config() {
    let c = client().await;

    assert_eq!(c.warnings().await.unwrap().len(), 1);
    assert!(c.clear_warnings().await.unwrap());
    assert!(c.warnings().await.unwrap().is_empty());

    assert_eq!(c.categories().await.unwrap(), ["*", "movies", "tv"]);
    assert!(c.scripts().await.unwrap().contains(&"notify.py".to_string()));

    let updated = c.set_config("misc", "bandwidth_max", "10M").await.unwrap();
    assert_eq!(updated["misc"]["bandwidth_max"], "10M");
    let port = c.get_config(Some("misc"), Some("port")).await.unwrap();
    assert_eq!(port["misc"], "8080");
    assert!(c.set_config_default(&["bandwidth_max"]).await.unwrap());

    assert_eq!(c.translate("Downloading").await.unwrap(), "Downloading");
}

#[tokio::test]
async fn lifecycle_actions() {
    let c = client().await;
    assert!(c.pause_queue().await.unwrap());
    assert!(c.queue(&QueueQuery::default()).await.unwrap().paused);
    assert!(c.resume_queue().await.unwrap());
    assert!(c.pause_for(15).await.unwrap());
    assert!(c.set_speed_limit("50%").await.unwrap());
    assert!(c.pause_post_processing().await.unwrap());
    assert!(c.resume_post_processing().await.unwrap());
    assert!(c.rss_now().await.unwrap());
    assert!(c.watched_now().await.unwrap());
    assert!(c.reset_quota().await.unwrap());
    assert!(c.retry_all().await.unwrap());
    assert!(c.restart_repair().await.unwrap());
    assert!(c.restart().await.unwrap());
    assert!(c.shutdown().await.unwrap());
    assert_eq!(c.change_complete_action("shutdown_pc").await.unwrap(), "ok\n");
}

#[tokio::test]
async fn unknown_mode_is_transport_error() {
    let c = client().await;
    let err = c.dispatch(Call::new("bogus")).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Transport(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = SabnzbdClient::new(&format!("http://{addr}"), "key").unwrap();
    let err = c.version().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Transport(TransportError::Request { .. })
    ));
    assert!(!err.to_string().contains("apikey=key"));
}

#[tokio::test]
async fn stalled_server_hits_configured_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept connections and never answer.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let config = ClientConfig::new(format!("http://{addr}"), "key")
        .with_timeout(Duration::from_millis(200));
    let c = SabnzbdClient::from_config(&config).unwrap();

    let started = Instant::now();
    let err = c.version().await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(5));
    match err {
        ApiError::Transport(TransportError::Request { source }) => {
            let cause = source
                .downcast_ref::<reqwest::Error>()
                .expect("reqwest error");
            assert!(cause.is_timeout());
        }
        other => panic!("expected a request failure, got {other:?}"),
    }
}
