// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tests for the workflow worker delegate.

#![cfg(feature = "workflow")]

mod common;

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use common::{CountingApp, RecordingSink, RequestFlag, write_group};
use gantry_runner::workflow::{
    ActivityFinalizer, DeclarationProvider, WorkerFactory, WorkerTuning, WorkflowWorker,
};
use gantry_runner::{
    Container, ENV_MODE, ErrorHandler, HttpRunner, PlainTextRenderer, Reclaim, RunnerConfig,
    RunnerError, WorkerEnvironment,
};

/// Worker fake recording registrations into the factory's shared log.
struct MockWorker {
    log: Arc<Mutex<Vec<String>>>,
    finalizer: Arc<Mutex<Option<ActivityFinalizer>>>,
}

impl WorkflowWorker for MockWorker {
    fn register_workflow_type(&mut self, type_name: &str) {
        self.log.lock().unwrap().push(format!("workflow:{type_name}"));
    }

    fn register_activity_type(&mut self, type_name: &str) {
        self.log.lock().unwrap().push(format!("activity:{type_name}"));
    }

    fn register_activity_finalizer(&mut self, finalize: ActivityFinalizer) {
        *self.finalizer.lock().unwrap() = Some(finalize);
    }
}

/// Engine fake. `run` simulates two completed activities by invoking
/// the registered finalizer.
struct MockFactory {
    log: Arc<Mutex<Vec<String>>>,
    finalizer: Arc<Mutex<Option<ActivityFinalizer>>>,
    queues: Arc<Mutex<Vec<String>>>,
    tuning: Arc<Mutex<Option<WorkerTuning>>>,
    runs: Arc<AtomicUsize>,
    simulated_activities: usize,
}

impl MockFactory {
    fn new(simulated_activities: usize) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(Mutex::new(Vec::new())),
            finalizer: Arc::new(Mutex::new(None)),
            queues: Arc::new(Mutex::new(Vec::new())),
            tuning: Arc::new(Mutex::new(None)),
            runs: Arc::new(AtomicUsize::new(0)),
            simulated_activities,
        })
    }

    fn registrations(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkerFactory for MockFactory {
    fn new_worker(&self, task_queue: &str, tuning: &WorkerTuning) -> Box<dyn WorkflowWorker> {
        self.queues.lock().unwrap().push(task_queue.to_string());
        *self.tuning.lock().unwrap() = Some(tuning.clone());
        Box::new(MockWorker {
            log: self.log.clone(),
            finalizer: self.finalizer.clone(),
        })
    }

    async fn run(&self) -> anyhow::Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let finalize = self.finalizer.lock().unwrap().clone();
        if let Some(finalize) = finalize {
            for _ in 0..self.simulated_activities {
                finalize();
            }
        }
        Ok(())
    }
}

struct Fixture {
    root: tempfile::TempDir,
    flag: Arc<RequestFlag>,
    reclaim: Arc<Reclaim>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            flag: Arc::new(RequestFlag::default()),
            reclaim: Arc::new(Reclaim::new()),
        }
    }

    fn config(&self) -> RunnerConfig {
        RunnerConfig::new(self.root.path())
    }

    fn container_builder(&self) -> gantry_runner::ContainerBuilder {
        let app = CountingApp::new(self.flag.clone(), self.reclaim.clone());
        Container::builder()
            .application(app)
            .error_handler(Arc::new(ErrorHandler::new(
                RecordingSink::new(),
                Arc::new(PlainTextRenderer),
            )))
            .resettable(self.flag.clone())
            .reclaim(self.reclaim.clone())
    }
}

fn workflow_env() -> WorkerEnvironment {
    WorkerEnvironment::from_pairs([(ENV_MODE, "workflow")])
}

fn declarations() -> DeclarationProvider {
    DeclarationProvider::new(
        vec!["OrderWorkflow".to_string(), "RefundWorkflow".to_string()],
        vec!["ChargeCard".to_string(), "SendReceipt".to_string()],
    )
}

#[tokio::test]
async fn test_registers_declarations_and_runs_engine_once() {
    let fixture = Fixture::new();
    let factory = MockFactory::new(2);
    let container = fixture
        .container_builder()
        .declarations(declarations())
        .worker_factory(factory.clone())
        .build();

    // Pretend an earlier activity left state behind.
    fixture.flag.value.store(true, Ordering::SeqCst);

    HttpRunner::new(fixture.config())
        .with_container_factory(move |_| Ok(container))
        .with_environment(workflow_env())
        .with_workflow_enabled(true)
        .unwrap()
        .run()
        .await
        .unwrap();

    // Workflows first, then activities, each in declaration order.
    assert_eq!(
        factory.registrations(),
        vec![
            "workflow:OrderWorkflow",
            "workflow:RefundWorkflow",
            "activity:ChargeCard",
            "activity:SendReceipt",
        ]
    );
    assert_eq!(factory.runs.load(Ordering::SeqCst), 1);
    assert_eq!(*factory.queues.lock().unwrap(), vec!["default"]);

    // The finalizer ran per simulated activity: reset plus reclaim.
    assert_eq!(fixture.reclaim.runs(), 2);
    assert!(!fixture.flag.value.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_declarations_and_tuning_load_from_config_group() {
    let fixture = Fixture::new();
    write_group(
        fixture.root.path(),
        "workflow",
        r#"{
            "workflows": ["SyncWorkflow"],
            "activities": ["PullBatch"],
            "tuning": {"max_concurrent_activities": 4, "activities_per_second": 1.5}
        }"#,
    );

    let factory = MockFactory::new(0);
    let container = fixture
        .container_builder()
        .worker_factory(factory.clone())
        .build();

    HttpRunner::new(fixture.config().with_task_queue("sync"))
        .with_container_factory(move |_| Ok(container))
        .with_environment(workflow_env())
        .with_workflow_enabled(true)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(
        factory.registrations(),
        vec!["workflow:SyncWorkflow", "activity:PullBatch"]
    );
    assert_eq!(*factory.queues.lock().unwrap(), vec!["sync"]);

    let tuning = factory.tuning.lock().unwrap().clone().unwrap();
    assert_eq!(tuning.max_concurrent_activities, Some(4));
    assert_eq!(tuning.activities_per_second, Some(1.5));
    assert_eq!(tuning.max_session_workers, None);
}

#[tokio::test]
async fn test_container_declarations_win_over_group_file() {
    let fixture = Fixture::new();
    write_group(
        fixture.root.path(),
        "workflow",
        r#"{"workflows": ["FromFile"]}"#,
    );

    let factory = MockFactory::new(0);
    let container = fixture
        .container_builder()
        .declarations(DeclarationProvider::new(
            vec!["FromContainer".to_string()],
            vec![],
        ))
        .worker_factory(factory.clone())
        .build();

    HttpRunner::new(fixture.config())
        .with_container_factory(move |_| Ok(container))
        .with_environment(workflow_env())
        .with_workflow_enabled(true)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(factory.registrations(), vec!["workflow:FromContainer"]);
}

#[tokio::test]
async fn test_missing_worker_factory_is_fatal() {
    let fixture = Fixture::new();
    let container = fixture
        .container_builder()
        .declarations(declarations())
        .build();

    let result = HttpRunner::new(fixture.config())
        .with_container_factory(move |_| Ok(container))
        .with_environment(workflow_env())
        .with_workflow_enabled(true)
        .unwrap()
        .run()
        .await;

    assert!(matches!(
        result,
        Err(RunnerError::ServiceNotFound("WorkerFactory"))
    ));
}

#[tokio::test]
async fn test_missing_declarations_are_fatal() {
    let fixture = Fixture::new();
    let factory = MockFactory::new(0);
    let container = fixture
        .container_builder()
        .worker_factory(factory.clone())
        .build();

    let result = HttpRunner::new(fixture.config())
        .with_container_factory(move |_| Ok(container))
        .with_environment(workflow_env())
        .with_workflow_enabled(true)
        .unwrap()
        .run()
        .await;

    assert!(matches!(
        result,
        Err(RunnerError::ServiceNotFound("DeclarationProvider"))
    ));
    assert_eq!(factory.runs.load(Ordering::SeqCst), 0);
}
