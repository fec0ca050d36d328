use httpmock::prelude::*;
use mist_reporter::core::delivery::{publish, FAILURE_BANNER, SUCCESS_BANNER};
use mist_reporter::core::pipeline::ReportData;
use mist_reporter::utils::error::TransportError;
use mist_reporter::{
    MistClient, ReportError, ReportKind, ReportPipeline, ReportRequest, SlackSink,
    TemplateRegistry,
};
use serde_json::Value;

const ORG_ID: &str = "12345678-1234-1234-1234-123456123456";
const SITE_ID: &str = "978c48e6-6ef6-11e6-8bbf-02e208b2d34f";
const NOW: i64 = 1_700_021_600;

fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let content = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn pipeline_for(server: &MockServer) -> ReportPipeline<MistClient> {
    let host = format!("{}/api/v1", server.address());
    let client = MistClient::new("http", &host, "test-token", None).unwrap();
    ReportPipeline::new(client, TemplateRegistry::builtin())
}

#[tokio::test]
async fn test_site_alerts_end_to_end() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/v1/sites/{}/alarms/search", SITE_ID))
            .query_param("limit", "100")
            .query_param("start", "1700000000")
            .query_param("end", "1700021600")
            .query_param("severity", "critical,warn,info")
            .header("Authorization", "Token test-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(fixture("site_alerts.json"));
    });

    let text = pipeline_for(&server)
        .run_request_at(&ReportRequest::site_alerts(SITE_ID), NOW)
        .await
        .unwrap();

    api_mock.assert();
    assert!(text.contains("*Site alerts* (2 found, 2 total)"));

    let critical = text.find("[CRITICAL] device_down").unwrap();
    let info = text.find("[INFO] dns_failure").unwrap();
    assert!(critical < info, "records must keep input order:\n{}", text);

    assert!(text.contains("hosts: ap-lobby-01"));
    assert!(text.contains("reasons: no heartbeat"));
    assert!(text.contains("last seen: 2023-11-15 03:46:40 UTC"));
}

#[tokio::test]
async fn test_marvis_issues_end_to_end() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/v1/labs/orgs/{}/suggestions", ORG_ID))
            .query_param("query", "group_by_category_symptom")
            .query_param("display_priority", "high")
            .query_param("active", "true");
        then.status(200).json_body(fixture("marvis_suggestions.json"));
    });

    let text = pipeline_for(&server)
        .run_request_at(&ReportRequest::marvis_issues(ORG_ID), NOW)
        .await
        .unwrap();

    api_mock.assert();
    assert!(text.contains("Auth failures: 5\n"));
    assert!(text.contains("DHCP failures: 6\n"));
    assert!(text.contains("ARP failures: 5\n"));
    assert!(text.contains("DNS failures: 4\n"));
    assert!(text.contains("Port flaps: 6"));
    assert!(text.contains("*Layer 1*"));
    assert!(!text.contains("No active high priority issues."));
}

#[tokio::test]
async fn test_list_of_sites_end_to_end() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/orgs/{}/sites", ORG_ID));
        then.status(200).json_body(fixture("org_sites.json"));
    });

    let text = pipeline_for(&server)
        .run_request_at(&ReportRequest::list_of_sites(ORG_ID), NOW)
        .await
        .unwrap();

    api_mock.assert();
    assert!(text.contains("*Sites* (2)"));
    assert!(text.contains("• Chicago HQ `978c48e6-6ef6-11e6-8bbf-02e208b2d34f` (America/Chicago)"));
    assert!(text.contains("• Denver Branch `a1b2c3d4-0000-4000-8000-000000000002`\n"));
}

#[tokio::test]
async fn test_fetch_builds_typed_model() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/labs/orgs/{}/suggestions", ORG_ID));
        then.status(200).json_body(fixture("marvis_suggestions.json"));
    });

    let path = ReportRequest::marvis_issues(ORG_ID).path(NOW);
    let data = pipeline_for(&server)
        .fetch(&path, ReportKind::MarvisIssues)
        .await
        .unwrap();

    match data {
        ReportData::Issues(issues) => {
            let connectivity = issues.connectivity.unwrap();
            assert_eq!(connectivity.auth_failure.total(), 5);
            assert_eq!(connectivity.dhcp_failure.total(), 6);
            assert_eq!(issues.access_point.unwrap().health_check.ap, 0);
        }
        other => panic!("unexpected report data: {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_halts_pipeline() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/sites/unknown-site/alarms/search");
        then.status(404).json_body(serde_json::json!({"detail": "not found"}));
    });

    let err = pipeline_for(&server)
        .run_request_at(&ReportRequest::site_alerts("unknown-site"), NOW)
        .await
        .unwrap_err();

    api_mock.assert_hits(1);
    assert!(matches!(
        err,
        ReportError::Transport(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/orgs/{}/sites", ORG_ID));
        then.status(500);
    });

    let err = pipeline_for(&server)
        .run_request_at(&ReportRequest::list_of_sites(ORG_ID), NOW)
        .await
        .unwrap_err();

    api_mock.assert_hits(1);
    assert!(matches!(err, ReportError::Transport(_)));
}

#[tokio::test]
async fn test_missing_mandatory_field_is_schema_error() {
    let mut payload = fixture("site_alerts.json");
    payload["results"][0].as_object_mut().unwrap().remove("id");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/sites/{}/alarms/search", SITE_ID));
        then.status(200).json_body(payload);
    });

    let err = pipeline_for(&server)
        .run_request_at(&ReportRequest::site_alerts(SITE_ID), NOW)
        .await
        .unwrap_err();

    match err {
        ReportError::Schema(e) => {
            assert_eq!(e.path, "results[0].id");
            assert_eq!(e.field(), "id");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_report_is_posted_to_slack() {
    let mist = MockServer::start();
    mist.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/orgs/{}/sites", ORG_ID));
        then.status(200).json_body(fixture("org_sites.json"));
    });

    let slack = MockServer::start();
    let slack_mock = slack.mock(|when, then| {
        when.method(POST)
            .path("/chat.postMessage")
            .header("Authorization", "Bearer xoxb-test")
            .body_contains(SUCCESS_BANNER)
            .body_contains("Chicago HQ");
        then.status(200).json_body(serde_json::json!({"ok": true}));
    });

    let outcome = pipeline_for(&mist)
        .run_request_at(&ReportRequest::list_of_sites(ORG_ID), NOW)
        .await;
    assert!(outcome.as_ref().unwrap().starts_with("*Sites*"));

    let sink = SlackSink::new(slack.base_url(), "xoxb-test", "C0123");
    publish(&sink, &outcome).await.unwrap();

    slack_mock.assert();
}

#[tokio::test]
async fn test_failure_is_posted_to_slack() {
    let mist = MockServer::start();
    mist.mock(|when, then| {
        when.method(GET).path(format!("/api/v1/orgs/{}/sites", ORG_ID));
        then.status(401);
    });

    let slack = MockServer::start();
    let slack_mock = slack.mock(|when, then| {
        when.method(POST)
            .path("/chat.postMessage")
            .body_contains(FAILURE_BANNER)
            .body_contains("credentials");
        then.status(200).json_body(serde_json::json!({"ok": true}));
    });

    let outcome = pipeline_for(&mist)
        .run_request_at(&ReportRequest::list_of_sites(ORG_ID), NOW)
        .await;
    assert!(outcome.is_err());

    let sink = SlackSink::new(slack.base_url(), "xoxb-test", "C0123");
    publish(&sink, &outcome).await.unwrap();

    slack_mock.assert();
}
