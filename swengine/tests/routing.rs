use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{Map, Value, json};
use swcommon::{RequestId, Topic};
use swengine::{
    Engine, EngineError, EngineErrorKind, EngineHooks, NO_RESPONSE, RouteRequest,
};
use swprovider::{
    ContentPart, InputSchema, OperationDescriptor, ParamType, ProviderConfig, ProviderConnector,
    ProviderError, ProviderFuture, ProviderTransport, TransportKind,
};

fn binary(name: &str, description: &str) -> OperationDescriptor {
    OperationDescriptor::new(
        "",
        name,
        description,
        InputSchema::from_properties([("a", ParamType::Number), ("b", ParamType::Number)]),
    )
}

fn unary(name: &str, description: &str) -> OperationDescriptor {
    OperationDescriptor::new(
        "",
        name,
        description,
        InputSchema::from_properties([("value", ParamType::Number)]),
    )
}

fn render(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

struct Calculator {
    closes: AtomicUsize,
}

impl ProviderTransport for Calculator {
    fn kind(&self) -> TransportKind {
        TransportKind::Stdio
    }

    fn list_operations<'a>(
        &'a self,
    ) -> ProviderFuture<'a, Result<Vec<OperationDescriptor>, ProviderError>> {
        Box::pin(async {
            Ok(vec![
                binary("add", "Add two numbers together"),
                binary("subtract", "Subtract second number from first number"),
                binary("multiply", "Multiply two numbers together"),
                binary("divide", "Divide first number by second number"),
                unary("sqrt", "Calculate square root of a number"),
                unary("abs", "Calculate absolute value of a number"),
            ])
        })
    }

    fn call_operation<'a>(
        &'a self,
        operation: &'a str,
        arguments: Map<String, Value>,
    ) -> ProviderFuture<'a, Result<Vec<ContentPart>, ProviderError>> {
        Box::pin(async move {
            let number = |name: &str| {
                arguments
                    .get(name)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| ProviderError::tool_failure(format!("missing argument '{name}'")))
            };

            let value = match operation {
                "add" => number("a")? + number("b")?,
                "subtract" => number("a")? - number("b")?,
                "multiply" => number("a")? * number("b")?,
                "divide" => {
                    let divisor = number("b")?;
                    if divisor == 0.0 {
                        return Err(ProviderError::tool_failure("Division by zero"));
                    }
                    number("a")? / divisor
                }
                "sqrt" => number("value")?.sqrt(),
                "abs" => number("value")?.abs(),
                other => return Err(ProviderError::rpc(-32601, format!("Unknown tool: {other}"))),
            };

            Ok(vec![ContentPart::text(render(value))])
        })
    }

    fn close<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

/// Echoes the operation and its arguments back as text.
struct Echo {
    operations: Mutex<Vec<OperationDescriptor>>,
    fail_close: bool,
}

impl Echo {
    fn new(operations: Vec<OperationDescriptor>) -> Self {
        Self {
            operations: Mutex::new(operations),
            fail_close: false,
        }
    }
}

impl ProviderTransport for Echo {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    fn list_operations<'a>(
        &'a self,
    ) -> ProviderFuture<'a, Result<Vec<OperationDescriptor>, ProviderError>> {
        Box::pin(async { Ok(self.operations.lock().expect("operations lock").clone()) })
    }

    fn call_operation<'a>(
        &'a self,
        operation: &'a str,
        arguments: Map<String, Value>,
    ) -> ProviderFuture<'a, Result<Vec<ContentPart>, ProviderError>> {
        Box::pin(async move {
            match operation {
                "snapshot" => Ok(vec![ContentPart::Other {
                    kind: "image".to_string(),
                    data: json!({"mimeType": "image/png", "data": "iVBORw0"}),
                }]),
                "wait" => std::future::pending().await,
                _ => Ok(vec![ContentPart::text(format!(
                    "{operation}:{}",
                    Value::Object(arguments)
                ))]),
            }
        })
    }

    fn close<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            if self.fail_close {
                Err(ProviderError::transport("broken pipe"))
            } else {
                Ok(())
            }
        })
    }
}

#[derive(Default)]
struct FakeConnector {
    transports: HashMap<String, Arc<dyn ProviderTransport>>,
}

impl FakeConnector {
    fn with(mut self, name: &str, transport: Arc<dyn ProviderTransport>) -> Self {
        self.transports.insert(name.to_string(), transport);
        self
    }
}

impl ProviderConnector for FakeConnector {
    fn connect<'a>(
        &'a self,
        config: &'a ProviderConfig,
    ) -> ProviderFuture<'a, Result<Arc<dyn ProviderTransport>, ProviderError>> {
        Box::pin(async move {
            self.transports.get(&config.name).cloned().ok_or_else(|| {
                ProviderError::spawn(format!("failed to spawn '{}': not found", config.name))
            })
        })
    }
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }

    fn push(&self, event: String) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl EngineHooks for RecordingHooks {
    fn on_connect_success(&self, provider: &str, _transport: TransportKind, _elapsed: Duration) {
        self.push(format!("connected:{provider}"));
    }

    fn on_connect_failure(
        &self,
        provider: &str,
        _transport: TransportKind,
        _error: &str,
        _elapsed: Duration,
    ) {
        self.push(format!("connect_failed:{provider}"));
    }

    fn on_catalog_built(&self, providers: usize, operations: usize) {
        self.push(format!("catalog:{providers}:{operations}"));
    }

    fn on_operation_selected(
        &self,
        request_id: &RequestId,
        operation: &OperationDescriptor,
        score: u32,
    ) {
        self.push(format!(
            "selected:{request_id}:{}/{}:{score}",
            operation.provider, operation.name
        ));
    }

    fn on_invocation_success(
        &self,
        request_id: &RequestId,
        provider: &str,
        operation: &str,
        _elapsed: Duration,
    ) {
        self.push(format!("invoked:{request_id}:{provider}/{operation}"));
    }

    fn on_no_suitable_operation(&self, request_id: &RequestId, provider: Option<&str>) {
        self.push(format!("miss:{request_id}:{}", provider.unwrap_or("auto")));
    }

    fn on_invocation_failure(&self, request_id: &RequestId, error: &EngineError, _elapsed: Duration) {
        self.push(format!("failed:{request_id}:{:?}", error.kind));
    }

    fn on_close_failure(&self, provider: &str, _error: &ProviderError) {
        self.push(format!("close_failed:{provider}"));
    }
}

/// Connects after a per-provider delay; providers without a transport fail
/// once their delay has elapsed.
struct DelayedConnector {
    delay: Duration,
    transports: HashMap<String, Arc<dyn ProviderTransport>>,
}

impl ProviderConnector for DelayedConnector {
    fn connect<'a>(
        &'a self,
        config: &'a ProviderConfig,
    ) -> ProviderFuture<'a, Result<Arc<dyn ProviderTransport>, ProviderError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.transports.get(&config.name).cloned().ok_or_else(|| {
                ProviderError::spawn(format!("failed to spawn '{}': not found", config.name))
            })
        })
    }
}

fn configs() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::stdio("calculator", "python3", ["calculator-server.py"])
            .with_topic(Topic::Arithmetic),
        ProviderConfig::http("github", "http://localhost:8081/mcp").with_topic(Topic::Repository),
        ProviderConfig::stdio("atlassian", "docker", ["run", "-i", "--rm"])
            .with_topic(Topic::IssueTracking)
            .with_topic(Topic::Documentation),
    ]
}

fn github() -> Arc<Echo> {
    Arc::new(Echo::new(vec![
        OperationDescriptor::new(
            "",
            "search_repositories",
            "Search for GitHub repositories",
            InputSchema::from_properties([("query", ParamType::String)]),
        ),
        OperationDescriptor::new(
            "",
            "get_file_contents",
            "Get the contents of a file from a GitHub repository",
            InputSchema::from_properties([
                ("owner", ParamType::String),
                ("repo", ParamType::String),
                ("path", ParamType::String),
            ]),
        ),
    ]))
}

async fn engine_with(hooks: Arc<RecordingHooks>) -> (Engine, Arc<Calculator>) {
    let calculator = Arc::new(Calculator {
        closes: AtomicUsize::new(0),
    });
    let connector = FakeConnector::default()
        .with("calculator", calculator.clone())
        .with("github", github());

    let engine = Engine::builder()
        .with_connector(Arc::new(connector))
        .with_hooks(hooks)
        .initialize(configs())
        .await;

    (engine, calculator)
}

async fn engine() -> Engine {
    engine_with(Arc::new(RecordingHooks::default())).await.0
}

#[tokio::test]
async fn auto_routing_adds_two_numbers() {
    let engine = engine().await;

    let result = engine.auto_route("add 5 and 3").await.expect("should route");

    assert_eq!(result.text, "8");
    assert_eq!(result.provider, "calculator");
    assert_eq!(result.operation, "add");
}

#[tokio::test]
async fn auto_routing_takes_a_square_root() {
    let engine = engine().await;

    let result = engine
        .auto_route("what is the square root of 144")
        .await
        .expect("should route");

    assert_eq!(result.operation, "sqrt");
    assert_eq!(result.text, "12");
}

#[tokio::test]
async fn manual_routing_never_leaves_the_named_provider() {
    let engine = engine().await;

    let result = engine
        .send_message("github", "add 5 and 3")
        .await
        .expect("should route");

    assert_eq!(result.provider, "github");
    assert_eq!(result.operation, "search_repositories");
    assert_eq!(result.text, r#"search_repositories:{"query":"add 5 and 3"}"#);
}

#[tokio::test]
async fn manual_routing_extracts_repository_references() {
    let engine = engine().await;

    let result = engine
        .send_message("github", "get_file_contents of README.md in rust-lang/cargo")
        .await
        .expect("should route");

    assert_eq!(result.operation, "get_file_contents");
    let (_, arguments) = result.text.split_once(':').expect("echo format");
    let arguments: Value = serde_json::from_str(arguments).expect("json");
    assert_eq!(arguments["owner"], "rust-lang");
    assert_eq!(arguments["repo"], "cargo");
}

#[tokio::test]
async fn manual_routing_to_a_provider_without_operations_returns_the_sentinel() {
    let engine = engine().await;

    let result = engine
        .send_message("atlassian", "find the onboarding page")
        .await
        .expect("sentinel is not an error");

    assert_eq!(result.text, "No suitable tools found on provider 'atlassian'");
    assert_eq!(result.provider, "atlassian");
    assert_eq!(result.operation, "none");
    assert!(result.is_no_suitable_tools());
}

#[tokio::test]
async fn manual_routing_to_an_unknown_provider_is_unavailable() {
    let engine = engine().await;

    let error = engine
        .send_message("slack", "hello")
        .await
        .expect_err("unknown provider");

    assert_eq!(error.kind, EngineErrorKind::ProviderUnavailable);
    assert_eq!(error.provider.as_deref(), Some("slack"));
}

#[tokio::test]
async fn auto_routing_with_an_empty_catalog_fails() {
    let engine = Engine::builder()
        .with_connector(Arc::new(FakeConnector::default()))
        .initialize(configs())
        .await;

    let error = engine
        .auto_route("add 5 and 3")
        .await
        .expect_err("nothing to route to");

    assert_eq!(error.kind, EngineErrorKind::NoSuitableOperation);
}

#[tokio::test]
async fn invocation_failures_carry_provider_and_operation() {
    let engine = engine().await;

    let error = engine
        .auto_route("divide 1 by 0")
        .await
        .expect_err("division by zero");

    assert_eq!(error.kind, EngineErrorKind::InvocationFailed);
    assert_eq!(error.provider.as_deref(), Some("calculator"));
    assert_eq!(error.operation.as_deref(), Some("divide"));
    assert!(error.message.contains("Division by zero"));
}

#[tokio::test]
async fn non_text_results_normalize_to_the_sentinel() {
    let media = Arc::new(Echo::new(vec![OperationDescriptor::new(
        "",
        "snapshot",
        "Capture a screenshot",
        InputSchema::empty(),
    )]));
    let engine = Engine::builder()
        .with_connector(Arc::new(FakeConnector::default().with("media", media)))
        .initialize(vec![ProviderConfig::http("media", "http://localhost:9/mcp")])
        .await;

    let text = engine
        .invoke("media", "snapshot", Map::new())
        .await
        .expect("invocation succeeds");

    assert_eq!(text, NO_RESPONSE);
}

#[tokio::test]
async fn invocations_are_bounded_by_the_deadline() {
    let slow = Arc::new(Echo::new(vec![OperationDescriptor::new(
        "",
        "wait",
        "Never answers",
        InputSchema::empty(),
    )]));
    let engine = Engine::builder()
        .with_connector(Arc::new(FakeConnector::default().with("slow", slow)))
        .with_invocation_timeout(Duration::from_millis(50))
        .initialize(vec![ProviderConfig::http("slow", "http://localhost:9/mcp")])
        .await;

    let error = engine
        .auto_route("anything")
        .await
        .expect_err("should time out");

    assert_eq!(error.kind, EngineErrorKind::Timeout);
    assert_eq!(error.provider.as_deref(), Some("slow"));
    assert_eq!(error.operation.as_deref(), Some("wait"));
}

#[tokio::test]
async fn dead_providers_fail_fast_on_direct_invocation() {
    let engine = engine().await;

    let error = engine
        .invoke("atlassian", "jira_search", Map::new())
        .await
        .expect_err("dead provider");

    assert_eq!(error.kind, EngineErrorKind::ProviderUnavailable);
    assert_eq!(error.operation.as_deref(), Some("jira_search"));
}

#[tokio::test]
async fn blank_and_oversized_messages_are_rejected() {
    let engine = engine().await;

    let blank = engine.auto_route("   ").await.expect_err("blank");
    assert_eq!(blank.kind, EngineErrorKind::InvalidRequest);

    let long = "1".repeat(engine.max_message_chars() + 1);
    let oversized = engine.auto_route(&long).await.expect_err("too long");
    assert_eq!(oversized.kind, EngineErrorKind::InvalidRequest);
}

#[tokio::test]
async fn status_reports_every_configured_provider() {
    let engine = engine().await;

    let status = engine.status();
    let names: Vec<_> = status.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["calculator", "github", "atlassian"]);

    assert!(status[0].connected);
    assert_eq!(status[0].operation_count, 6);
    assert_eq!(status[1].transport, TransportKind::Http);
    assert!(!status[2].connected);
    assert_eq!(status[2].operation_count, 0);
    assert!(status[2].error.as_deref().expect("error").contains("not found"));
}

#[tokio::test]
async fn operation_listing_groups_by_provider() {
    let engine = engine().await;

    let listing = engine.list_operations();
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[1].provider, "github");
    assert_eq!(listing[1].operations[0].name, "search_repositories");
    assert!(listing[2].operations.is_empty());
}

#[tokio::test]
async fn recache_picks_up_newly_advertised_operations() {
    let echo = Arc::new(Echo::new(Vec::new()));
    let engine = Engine::builder()
        .with_connector(Arc::new(FakeConnector::default().with("echo", echo.clone())))
        .initialize(vec![ProviderConfig::http("echo", "http://localhost:9/mcp")])
        .await;
    assert!(engine.catalog().is_empty());

    echo.operations
        .lock()
        .expect("operations lock")
        .push(OperationDescriptor::new("", "ping", "", InputSchema::empty()));

    assert_eq!(engine.recache().await, 1);
    let result = engine.auto_route("ping").await.expect("routes after recache");
    assert_eq!(result.text, r#"ping:{"query":"ping"}"#);
}

#[tokio::test]
async fn hooks_observe_connections_selection_and_invocation() {
    let hooks = Arc::new(RecordingHooks::default());
    let (engine, _) = engine_with(hooks.clone()).await;

    engine
        .handle(RouteRequest::auto("add 5 and 3").with_request_id("req-1"))
        .await
        .expect("should route");

    let events = hooks.events();
    assert!(events.contains(&"connected:calculator".to_string()));
    assert!(events.contains(&"connect_failed:atlassian".to_string()));
    assert!(events.contains(&"catalog:3:8".to_string()));
    assert!(events.contains(&"selected:req-1:calculator/add:125".to_string()));
    assert!(events.contains(&"invoked:req-1:calculator/add".to_string()));
}

#[tokio::test]
async fn shutdown_closes_live_providers_and_tolerates_failures() {
    let hooks = Arc::new(RecordingHooks::default());
    let calculator = Arc::new(Calculator {
        closes: AtomicUsize::new(0),
    });
    let flaky = Arc::new(Echo {
        operations: Mutex::new(Vec::new()),
        fail_close: true,
    });
    let engine = Engine::builder()
        .with_connector(Arc::new(
            FakeConnector::default()
                .with("flaky", flaky)
                .with("calculator", calculator.clone()),
        ))
        .with_hooks(hooks.clone())
        .initialize(vec![
            ProviderConfig::http("flaky", "http://localhost:9/mcp"),
            ProviderConfig::stdio("calculator", "python3", ["calculator-server.py"]),
        ])
        .await;

    engine.shutdown().await;

    assert_eq!(calculator.closes.load(Ordering::SeqCst), 1);
    assert!(hooks.events().contains(&"close_failed:flaky".to_string()));

    let error = engine
        .invoke("calculator", "add", Map::new())
        .await
        .expect_err("closed");
    assert_eq!(error.kind, EngineErrorKind::ProviderUnavailable);
}

#[tokio::test]
async fn connection_attempts_run_concurrently() {
    let delay = Duration::from_millis(200);
    let calculator: Arc<dyn ProviderTransport> = Arc::new(Calculator {
        closes: AtomicUsize::new(0),
    });
    let github: Arc<dyn ProviderTransport> = github();
    let connector = DelayedConnector {
        delay,
        transports: HashMap::from([
            ("calculator".to_string(), calculator),
            ("github".to_string(), github),
        ]),
    };

    let started = Instant::now();
    let engine = Engine::builder()
        .with_connector(Arc::new(connector))
        .initialize(configs())
        .await;
    let elapsed = started.elapsed();

    assert!(elapsed >= delay, "initialize returned before every attempt settled");
    assert!(
        elapsed < delay * 2,
        "three attempts took {elapsed:?}, expected roughly one delay"
    );

    let connected: Vec<_> = engine
        .status()
        .into_iter()
        .map(|status| (status.name, status.connected))
        .collect();
    assert_eq!(
        connected,
        vec![
            ("calculator".to_string(), true),
            ("github".to_string(), true),
            ("atlassian".to_string(), false),
        ]
    );

    let result = engine.auto_route("add 5 and 3").await.expect("should route");
    assert_eq!(result.text, "8");
}

#[tokio::test]
async fn routing_misses_are_reported_to_hooks() {
    let hooks = Arc::new(RecordingHooks::default());
    let (engine, _) = engine_with(hooks.clone()).await;

    engine
        .handle(RouteRequest::manual("atlassian", "find the onboarding page").with_request_id("req-2"))
        .await
        .expect("sentinel is not an error");

    let empty = Engine::builder()
        .with_connector(Arc::new(FakeConnector::default()))
        .with_hooks(hooks.clone())
        .initialize(configs())
        .await;
    empty
        .handle(RouteRequest::auto("add 5 and 3").with_request_id("req-3"))
        .await
        .expect_err("nothing to route to");

    let events = hooks.events();
    assert!(events.contains(&"miss:req-2:atlassian".to_string()));
    assert!(events.contains(&"miss:req-3:auto".to_string()));
}

#[tokio::test]
async fn an_operation_named_none_is_not_the_sentinel() {
    let tracker = Arc::new(Echo::new(vec![OperationDescriptor::new(
        "",
        "none",
        "Clear the assignee",
        InputSchema::empty(),
    )]));
    let engine = Engine::builder()
        .with_connector(Arc::new(FakeConnector::default().with("tracker", tracker)))
        .initialize(vec![ProviderConfig::http("tracker", "http://localhost:9/mcp")])
        .await;

    let result = engine
        .send_message("tracker", "unassign it")
        .await
        .expect("should route");

    assert_eq!(result.operation, "none");
    assert!(!result.is_no_suitable_tools());
    assert_eq!(result.text, r#"none:{"query":"unassign it"}"#);
}
