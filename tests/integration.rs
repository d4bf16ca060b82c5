//! End-to-end executor scenarios against the scripted driver

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use page_driver::{ContainerHits, FieldHit, MockDriver};
use webpilot_cli::{ActionExecutor, ChannelSink, EngineConfig, ProgressEvent, Session, TracingSink};
use webpilot_core_types::{
    Action, ActionResult, ActionStatus, BlockKind, ExtractionSchema, FailureKind, FieldValue,
};

fn fast_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.resolver.visibility_timeout = Duration::from_millis(5);
    config.handlers.poll_interval = Duration::from_millis(1);
    config.handlers.poll_budget = Duration::from_millis(5);
    config.navigation_retry.initial_delay = Duration::from_millis(1);
    config.navigation_retry.max_delay = Duration::from_millis(2);
    config
}

fn product(name: &str, price: &str) -> ContainerHits {
    let mut fields = BTreeMap::new();
    fields.insert(
        "name".to_string(),
        FieldHit {
            text: Some(name.to_string()),
            attr: None,
            matched_selector: Some("h2".to_string()),
        },
    );
    fields.insert(
        "price".to_string(),
        FieldHit {
            text: Some(price.to_string()),
            attr: None,
            matched_selector: Some("span.a-price > span.a-offscreen".to_string()),
        },
    );
    ContainerHits { fields }
}

#[tokio::test]
async fn full_shopping_flow_produces_typed_records() {
    let driver = Arc::new(MockDriver::new());
    {
        let mut state = driver.state();
        state.visible.insert("input#twotabsearchtextbox".to_string());
        state.containers.insert(
            "div[data-component-type='s-search-result']".to_string(),
            vec![
                product("Acme Laptop 14", "₹1,25,999"),
                product("Acme Laptop 16", "₹1,45,999"),
                product("Budget Laptop", "₹35,000"),
            ],
        );
    }

    let mut session = Session::with_driver(driver.clone(), fast_config());
    let sink = TracingSink;
    let actions = vec![
        Action::Navigate {
            url: "https://www.amazon.in".to_string(),
        },
        Action::Type {
            selector: "input#twotabsearchtextbox".to_string(),
            text: "laptop".to_string(),
            role: None,
            submit: true,
        },
        Action::Extract {
            schema: ExtractionSchema::new()
                .with_field("name", "h2")
                .with_field("price", "span.a-price > span.a-offscreen"),
            limit: Some(2),
        },
    ];

    let summary = ActionExecutor::new(&mut session, &sink).run(&actions).await;

    assert!(!summary.stopped_early);
    assert_eq!(summary.reports.len(), 3);
    assert!(summary.reports.iter().all(|r| r.status == ActionStatus::Success));

    // Typing submitted with a keyboard Enter.
    assert_eq!(
        driver.state().keys,
        vec![("input#twotabsearchtextbox".to_string(), "Enter".to_string())]
    );

    match summary.reports[2].result.as_ref().unwrap() {
        ActionResult::Extracted { records, .. } => {
            assert_eq!(records.len(), 2);
            assert_eq!(
                records[0].get("price"),
                Some(&FieldValue::Number(125999.0))
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn wait_timeout_triggers_block_detection() {
    let driver = Arc::new(MockDriver::new());
    let mut session = Session::with_driver(driver.clone(), fast_config());
    let sink = TracingSink;

    // Land on a clean page first.
    let summary = ActionExecutor::new(&mut session, &sink)
        .run(&[Action::Navigate {
            url: "https://www.google.com/search?q=pizza".to_string(),
        }])
        .await;
    assert_eq!(summary.reports[0].status, ActionStatus::Success);

    // The page now turns into a challenge; the wait will never succeed.
    driver.state().body =
        "Our systems have detected unusual traffic from your computer network".to_string();

    let summary = ActionExecutor::new(&mut session, &sink)
        .run(&[Action::WaitFor {
            selector: ".results".to_string(),
            timeout_ms: 10,
        }])
        .await;

    let report = &summary.reports[0];
    assert_eq!(report.status, ActionStatus::Blocked);
    let failure = report.failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::Blocked);
    let block = failure.block.as_ref().unwrap();
    assert!(block.blocked);
    assert_eq!(block.kind, BlockKind::Captcha);
    assert!(!failure.alternatives.is_empty());
}

#[tokio::test]
async fn wait_timeout_on_clean_page_stays_a_timeout() {
    let driver = Arc::new(MockDriver::new());
    driver.state().url = "https://example.com".to_string();
    driver.state().body = "an ordinary slow page".to_string();
    let mut session = Session::with_driver(driver, fast_config());
    let sink = TracingSink;

    let summary = ActionExecutor::new(&mut session, &sink)
        .run(&[Action::WaitFor {
            selector: ".late".to_string(),
            timeout_ms: 10,
        }])
        .await;

    let failure = summary.reports[0].failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert!(failure.block.is_none());
}

#[tokio::test]
async fn first_error_stops_remaining_actions() {
    let driver = Arc::new(MockDriver::new());
    let mut session = Session::with_driver(driver.clone(), fast_config());
    let (sink, mut events) = ChannelSink::new();

    let actions = vec![
        Action::Navigate {
            url: "https://example.com".to_string(),
        },
        Action::Click {
            selector: "#missing-button".to_string(),
            role: None,
        },
        Action::Navigate {
            url: "https://example.com/never-reached".to_string(),
        },
    ];

    let summary = ActionExecutor::new(&mut session, &sink).run(&actions).await;

    assert!(summary.stopped_early);
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.reports[1].status, ActionStatus::Error);
    let failure = summary.reports[1].failure.as_ref().unwrap();
    assert_eq!(failure.kind, FailureKind::SelectorNotFound);
    assert_eq!(failure.tried_selectors, vec!["#missing-button".to_string()]);

    // The third navigation never happened.
    assert_eq!(driver.state().navigations.len(), 1);

    // Progress stream: started/finished pairs plus the final run event.
    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(match event {
            ProgressEvent::ActionStarted { .. } => "started",
            ProgressEvent::ActionFinished { .. } => "finished",
            ProgressEvent::RunFinished { stopped_early, .. } => {
                assert!(stopped_early);
                "run_finished"
            }
        });
    }
    assert_eq!(
        kinds,
        vec!["started", "finished", "started", "finished", "run_finished"]
    );
}

#[tokio::test]
async fn blocked_navigation_reports_alternatives() {
    let driver = Arc::new(MockDriver::new());
    driver.state().body = "Enter the characters you see below".to_string();
    let mut session = Session::with_driver(driver, fast_config());
    let sink = TracingSink;

    let summary = ActionExecutor::new(&mut session, &sink)
        .run(&[Action::Navigate {
            url: "https://www.amazon.in/s?k=tv".to_string(),
        }])
        .await;

    let report = &summary.reports[0];
    assert_eq!(report.status, ActionStatus::Blocked);
    let failure = report.failure.as_ref().unwrap();
    assert!(failure
        .alternatives
        .iter()
        .any(|alt| alt.contains("flipkart")));
}
