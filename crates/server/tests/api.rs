use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use llm::{LlmError, LlmProvider, LlmRequest, LlmResponse, LlmResult, ProviderId, TokenUsage};
use serde_json::{json, Value};
use server::config::ServerConfig;
use server::routes::{AI_ERROR_ANSWER, AI_UNAVAILABLE_ANSWER, EMPTY_QUESTION_ANSWER};
use server::system_metrics::{CpuMetrics, MemoryMetrics, MetricsError, SystemSnapshot};
use server::{build_state, router, Dependencies, JsonFileDatasetRepository, SystemMetricsSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const DATASET: &str = r#"{
  "salesReps": [
    {
      "id": 1,
      "name": "Alice",
      "role": "Senior Sales Executive",
      "region": "North America",
      "skills": ["Negotiation"],
      "deals": [
        {"client": "Acme Corp", "value": 100, "status": "Closed Won"},
        {"client": "Beta Ltd", "value": 50, "status": "In Progress"}
      ],
      "clients": [{"name": "Acme Corp", "industry": "Manufacturing", "contact": "a@acme.test"}]
    },
    {
      "id": 2,
      "name": "Bruno",
      "role": "Account Manager",
      "region": "Europe",
      "skills": [],
      "deals": [
        {"client": "Gamma GmbH", "value": 200, "status": "Closed Lost"}
      ],
      "clients": []
    }
  ]
}"#;

struct StubProvider {
    reply: LlmResult<String>,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(reply: LlmResult<String>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new("stub", "stub-model")
    }

    async fn complete(&self, _request: LlmRequest) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map(|content| LlmResponse {
            content,
            usage: TokenUsage::new(1, 1),
            model: "stub-model".to_string(),
            finish_reason: "stop".to_string(),
            response_time: Duration::from_millis(1),
        })
    }

    async fn count_tokens(&self, _text: &str) -> LlmResult<u32> {
        self.reply.clone().map(|_| 1)
    }
}

struct StubMetrics(f64);

impl SystemMetricsSource for StubMetrics {
    fn sample(&self) -> Result<SystemSnapshot, MetricsError> {
        Ok(SystemSnapshot {
            memory: MemoryMetrics {
                total: 16_853_590_016,
                available: 8_543_252_480,
                percent: 49.3,
            },
            cpu: CpuMetrics {
                usage: self.0,
                cores: 8,
            },
        })
    }
}

struct Harness {
    app: Router,
    dir: TempDir,
}

impl Harness {
    fn data_path(&self) -> std::path::PathBuf {
        self.dir.path().join("dummyData.json")
    }
}

async fn harness(provider: Option<Arc<dyn LlmProvider>>, cpu_usage: f64) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dummyData.json");
    std::fs::write(&path, DATASET).unwrap();

    let config = ServerConfig {
        data_file: path.clone(),
        ..ServerConfig::default()
    };
    let deps = Dependencies {
        repository: Arc::new(JsonFileDatasetRepository::new(path)),
        provider,
        metrics: Arc::new(StubMetrics(cpu_usage)),
    };

    let state = build_state(&config, deps).await.unwrap();
    Harness {
        app: router(state),
        dir,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn ask(question: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "question": question }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_message() {
    let h = harness(None, 10.0).await;
    let (status, body) = send(&h.app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("running"));
}

#[tokio::test]
async fn test_data_returns_full_dataset() {
    let h = harness(None, 10.0).await;
    let (status, body) = send(&h.app, get("/api/data")).await;

    assert_eq!(status, StatusCode::OK);
    let reps = body["salesReps"].as_array().unwrap();
    assert_eq!(reps.len(), 2);
    assert_eq!(reps[0]["deals"][0]["status"], "Closed Won");
    assert_eq!(reps[0]["clients"][0]["industry"], "Manufacturing");
}

#[tokio::test]
async fn test_sales_analytics() {
    let h = harness(None, 10.0).await;
    let (status, body) = send(&h.app, get("/api/sales-analytics")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDealCount"], 3);
    assert_eq!(
        body["dealStatusSummary"],
        json!({"Closed Won": 1, "In Progress": 1, "Closed Lost": 1})
    );
    assert_eq!(body["totalDealValue"], 350.0);
    let average = body["averageDealValue"].as_f64().unwrap();
    assert!((average - 116.67).abs() < 0.01);
    assert_eq!(body["regionDistribution"], json!(["Europe", "North America"]));
}

#[tokio::test]
async fn test_ai_without_credential_is_unavailable() {
    let h = harness(None, 10.0).await;

    let (status, body) = send(&h.app, ask("Who is the top performer?")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], AI_UNAVAILABLE_ANSWER);

    let (_, body) = send(&h.app, ask("")).await;
    assert_eq!(body["answer"], AI_UNAVAILABLE_ANSWER);
}

#[tokio::test]
async fn test_ai_blank_question_makes_no_call() {
    let provider = StubProvider::new(Ok("unused".to_string()));
    let h = harness(Some(provider.clone()), 10.0).await;

    for question in ["", "   "] {
        let (status, body) = send(&h.app, ask(question)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], EMPTY_QUESTION_ANSWER);
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ai_answer_and_failure() {
    let provider = StubProvider::new(Ok("Alice leads North America.".to_string()));
    let h = harness(Some(provider.clone()), 10.0).await;
    let (_, body) = send(&h.app, ask("Who leads North America?")).await;
    assert_eq!(body["answer"], "Alice leads North America.");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let failing = StubProvider::new(Err(LlmError::Network("connection refused".to_string())));
    let h = harness(Some(failing), 10.0).await;
    let (status, body) = send(&h.app, ask("Who leads North America?")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], AI_ERROR_ANSWER);
}

#[tokio::test]
async fn test_ai_malformed_body_is_rejected() {
    let h = harness(None, 10.0).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header("content-type", "application/json")
        .body(Body::from("{\"query\": 1}"))
        .unwrap();

    let response = h.app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_health_all_up_is_200() {
    let provider = StubProvider::new(Ok("ok".to_string()));
    let h = harness(Some(provider), 25.2).await;
    let (status, body) = send(&h.app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "1.0.0");
    assert!(body["timestamp"].as_f64().unwrap() > 0.0);

    let components = &body["components"];
    assert_eq!(components["datastore"]["status"], "up");
    assert_eq!(components["datastore"]["type"], "file");
    assert!(components["datastore"]["responseTime"].is_number());
    assert_eq!(components["gemini_api"]["status"], "up");
    assert_eq!(components["system"]["status"], "up");
    assert_eq!(components["system"]["memory"]["percent"], 49.3);
    assert_eq!(components["system"]["cpu"]["cores"], 8);
}

#[tokio::test]
async fn test_health_without_credential_stays_healthy() {
    let h = harness(None, 25.2).await;
    let (status, body) = send(&h.app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["gemini_api"]["status"], "disabled");
}

#[tokio::test]
async fn test_health_missing_datastore_is_503() {
    let h = harness(None, 25.2).await;
    std::fs::remove_file(h.data_path()).unwrap();

    let (status, body) = send(&h.app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["datastore"]["status"], "down");
    assert!(body["components"]["datastore"]["error"].is_string());

    // data already in memory is still served
    let (status, _) = send(&h.app, get("/api/data")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_remote_failure_and_overload_degrade() {
    let failing = StubProvider::new(Err(LlmError::Http {
        status: 403,
        message: "API key not valid".to_string(),
    }));
    let h = harness(Some(failing), 25.2).await;
    let (status, body) = send(&h.app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["components"]["gemini_api"]["status"], "down");

    let h = harness(None, 99.0).await;
    let (status, body) = send(&h.app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["system"]["status"], "warning");
}

#[tokio::test]
async fn test_invalid_dataset_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dummyData.json");
    std::fs::write(
        &path,
        r#"{"salesReps": [{"id": 1, "name": "A", "role": "R", "region": "X",
            "deals": [{"client": "C", "value": 1, "status": "Pending"}]}]}"#,
    )
    .unwrap();

    let deps = Dependencies {
        repository: Arc::new(JsonFileDatasetRepository::new(&path)),
        provider: None,
        metrics: Arc::new(StubMetrics(1.0)),
    };
    let Err(err) = build_state(&ServerConfig::default(), deps).await else {
        panic!("startup should fail on an unknown deal status");
    };
    assert!(format!("{err:#}").contains("Pending"));
}
