use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use frontwatch::engine::runtime::SequenceRunner;
use frontwatch::engine::{
    ChangeAction, ChangeEvent, Runtime, RuntimeEvent, TaskInvocation, TaskSequence,
};
use frontwatch::errors::FrontwatchError;
use frontwatch::exec::ResolvedStep;
use frontwatch::fs::mock::MockFileSystem;
use frontwatch::fs::FileSystem;
use frontwatch::pipeline::pipeline_sequence;
use frontwatch_test_utils::builders::ConfigFileBuilder;
use frontwatch_test_utils::fake_backend::FakeStepBackend;
use frontwatch_test_utils::{init_tracing, with_timeout};

fn changed(path: &str) -> RuntimeEvent {
    RuntimeEvent::FileChanged(ChangeEvent {
        path: PathBuf::from(path),
        action: ChangeAction::Changed,
    })
}

fn executed_names(executed: &Arc<Mutex<Vec<ResolvedStep>>>) -> Vec<String> {
    executed.lock().unwrap().iter().map(|s| s.name.clone()).collect()
}

#[tokio::test]
async fn script_event_runs_lint_then_single_spec_with_manifest() {
    init_tracing();
    with_timeout(async {
        let cfg = ConfigFileBuilder::new().build();
        let mock = MockFileSystem::new();
        mock.add_file(
            "./index.html",
            r#"<script src="js/app.js"></script>"#,
        );
        mock.add_file("./foo-spec.js", "describe()");
        let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());

        let executed = Arc::new(Mutex::new(Vec::new()));
        let backend = FakeStepBackend::new(Arc::clone(&executed));
        let runner = SequenceRunner::new(cfg, fs, PathBuf::from("."), backend);

        let (tx, rx) = mpsc::channel(16);
        // Refresh the manifest first, then edit a script with a spec.
        tx.send(changed("index.html")).await.unwrap();
        tx.send(changed("foo.js")).await.unwrap();
        drop(tx);

        Runtime::new(runner, rx).run(TaskSequence::new()).await.unwrap();

        assert_eq!(
            executed_names(&executed),
            vec!["lint".to_string(), "test-single-spec".to_string()]
        );

        let steps = executed.lock().unwrap();
        assert_eq!(steps[0].cmd, "echo lint foo.js");
        assert_eq!(
            steps[1].cmd,
            "echo test js/app.js bower_components/angular-mocks/angular-mocks.js foo-spec.js"
        );
    })
    .await;
}

#[tokio::test]
async fn initial_sequence_primes_manifest_and_lints_project() {
    init_tracing();
    with_timeout(async {
        let cfg = ConfigFileBuilder::new().build();
        let mock = MockFileSystem::new();
        mock.add_file(
            "./index.html",
            r#"<script src="js/app.js"></script>"#,
        );
        mock.add_file("./widget-spec.js", "describe()");
        let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());

        let executed = Arc::new(Mutex::new(Vec::new()));
        let backend = FakeStepBackend::new(Arc::clone(&executed));
        let runner = SequenceRunner::new(cfg, fs, PathBuf::from("."), backend);

        let mut initial = TaskSequence::new();
        initial.push(TaskInvocation::RereadEntryScripts);
        initial.push(TaskInvocation::Lint {
            files: vec![PathBuf::from("src/**/*.js"), PathBuf::from("*.js")],
        });

        let (tx, rx) = mpsc::channel(16);
        tx.send(changed("widget.js")).await.unwrap();
        drop(tx);

        Runtime::new(runner, rx).run(initial).await.unwrap();

        let steps = executed.lock().unwrap();
        // Startup lint covers the project globs.
        assert_eq!(steps[0].name, "lint");
        assert_eq!(steps[0].cmd, "echo lint src/**/*.js *.js");
        // The watch event sees the manifest the initial reread loaded.
        assert_eq!(steps[1].cmd, "echo lint widget.js");
        assert_eq!(
            steps[2].cmd,
            "echo test js/app.js bower_components/angular-mocks/angular-mocks.js widget-spec.js"
        );
    })
    .await;
}

#[tokio::test]
async fn failed_step_drops_rest_of_sequence_but_not_the_loop() {
    init_tracing();
    with_timeout(async {
        let cfg = ConfigFileBuilder::new().build();
        let mock = MockFileSystem::new();
        mock.add_file("./foo-spec.js", "describe()");
        let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());

        let executed = Arc::new(Mutex::new(Vec::new()));
        let backend = FakeStepBackend::new(Arc::clone(&executed)).failing("lint");
        let runner = SequenceRunner::new(cfg, fs, PathBuf::from("."), backend);

        let (tx, rx) = mpsc::channel(16);
        tx.send(changed("foo.js")).await.unwrap();
        tx.send(changed("bar.js")).await.unwrap();
        drop(tx);

        Runtime::new(runner, rx).run(TaskSequence::new()).await.unwrap();

        // Lint failed both times; the spec run after it never happened, but
        // the second event was still processed.
        assert_eq!(
            executed_names(&executed),
            vec!["lint".to_string(), "lint".to_string()]
        );
    })
    .await;
}

#[tokio::test]
async fn shutdown_event_stops_the_loop() {
    init_tracing();
    with_timeout(async {
        let cfg = ConfigFileBuilder::new().build();
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());

        let executed = Arc::new(Mutex::new(Vec::new()));
        let backend = FakeStepBackend::new(Arc::clone(&executed));
        let runner = SequenceRunner::new(cfg, fs, PathBuf::from("."), backend);

        let (tx, rx) = mpsc::channel(16);
        tx.send(changed("foo.js")).await.unwrap();
        tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
        tx.send(changed("bar.js")).await.unwrap();

        // Keep tx alive: exit must come from the shutdown event, not from
        // the channel closing.
        Runtime::new(runner, rx).run(TaskSequence::new()).await.unwrap();

        assert_eq!(executed_names(&executed), vec!["lint".to_string()]);
        drop(tx);
    })
    .await;
}

#[tokio::test]
async fn strict_pipeline_run_fails_fast_on_step_failure() {
    init_tracing();
    with_timeout(async {
        let cfg = ConfigFileBuilder::new()
            .with_step("compile-css", "lessc less/styles.less temp/app.css")
            .with_step("minify-css", "cleancss temp/app.css")
            .with_pipeline("css", &["compile-css", "minify-css"])
            .build();
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());

        let executed = Arc::new(Mutex::new(Vec::new()));
        let backend =
            FakeStepBackend::new(Arc::clone(&executed)).failing("compile-css");
        let mut runner = SequenceRunner::new(cfg.clone(), fs, PathBuf::from("."), backend);

        let sequence = pipeline_sequence(&cfg, "css").unwrap();
        let err = runner.execute_strict(sequence).await.unwrap_err();

        assert!(matches!(
            err,
            FrontwatchError::StepFailed { ref step, code: 1 } if step == "compile-css"
        ));
        assert_eq!(executed_names(&executed), vec!["compile-css".to_string()]);
    })
    .await;
}
