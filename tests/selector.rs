use std::path::{Path, PathBuf};

use frontwatch::engine::selector::{select_tasks, spec_path_for, ScriptFileList};
use frontwatch::engine::{ChangeAction, ChangeEvent, TaskInvocation};
use frontwatch::fs::mock::MockFileSystem;
use frontwatch_test_utils::builders::ConfigFileBuilder;

fn changed(path: &str) -> ChangeEvent {
    ChangeEvent {
        path: PathBuf::from(path),
        action: ChangeAction::Changed,
    }
}

#[test]
fn script_with_spec_selects_lint_then_test() {
    let cfg = ConfigFileBuilder::new().build();
    let fs = MockFileSystem::new();
    fs.add_file("./foo-spec.js", "describe()");

    let scripts: ScriptFileList = vec![PathBuf::from("js/app.js")];
    let sequence = select_tasks(
        &changed("foo.js"),
        &fs,
        Path::new("."),
        cfg.project(),
        &scripts,
    );

    assert_eq!(sequence.ids(), vec!["lint", "test-single-spec"]);

    let tasks: Vec<_> = sequence.iter().cloned().collect();
    match &tasks[0] {
        TaskInvocation::Lint { files } => {
            assert_eq!(files, &vec![PathBuf::from("foo.js")]);
        }
        other => panic!("expected lint first, got {other:?}"),
    }
    match &tasks[1] {
        TaskInvocation::TestSingleSpec { files } => {
            // Manifest first, then the mock script, then the resolved spec.
            assert_eq!(
                files,
                &vec![
                    PathBuf::from("js/app.js"),
                    PathBuf::from("bower_components/angular-mocks/angular-mocks.js"),
                    PathBuf::from("foo-spec.js"),
                ]
            );
        }
        other => panic!("expected test-single-spec second, got {other:?}"),
    }
}

#[test]
fn script_without_spec_selects_only_lint() {
    let cfg = ConfigFileBuilder::new().build();
    let fs = MockFileSystem::new();

    let sequence = select_tasks(
        &changed("foo.js"),
        &fs,
        Path::new("."),
        cfg.project(),
        &ScriptFileList::new(),
    );

    assert_eq!(sequence.ids(), vec!["lint"]);
}

#[test]
fn changed_spec_file_is_its_own_spec() {
    let cfg = ConfigFileBuilder::new().build();
    let fs = MockFileSystem::new();
    fs.add_file("./foo-spec.js", "describe()");

    let sequence = select_tasks(
        &changed("foo-spec.js"),
        &fs,
        Path::new("."),
        cfg.project(),
        &ScriptFileList::new(),
    );

    assert_eq!(sequence.ids(), vec!["lint", "test-single-spec"]);

    let test = sequence
        .iter()
        .find_map(|t| match t {
            TaskInvocation::TestSingleSpec { files } => Some(files.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(test.last(), Some(&PathBuf::from("foo-spec.js")));
}

#[test]
fn entry_page_change_selects_reread() {
    let cfg = ConfigFileBuilder::new().build();
    let fs = MockFileSystem::new();

    let sequence = select_tasks(
        &changed("index.html"),
        &fs,
        Path::new("."),
        cfg.project(),
        &ScriptFileList::new(),
    );

    assert_eq!(sequence.ids(), vec!["reread-entry-scripts"]);
}

#[test]
fn other_markup_is_not_the_entry_page() {
    let cfg = ConfigFileBuilder::new().build();
    let fs = MockFileSystem::new();

    let sequence = select_tasks(
        &changed("partials/menu.html"),
        &fs,
        Path::new("."),
        cfg.project(),
        &ScriptFileList::new(),
    );

    assert!(sequence.is_empty());
}

#[test]
fn stylesheet_change_selects_nothing() {
    let cfg = ConfigFileBuilder::new().build();
    let fs = MockFileSystem::new();

    let sequence = select_tasks(
        &changed("less/styles.less"),
        &fs,
        Path::new("."),
        cfg.project(),
        &ScriptFileList::new(),
    );

    assert!(sequence.is_empty());
}

#[test]
fn script_entry_page_gets_lint_and_reread() {
    // An entry page that is itself a script hits both rules; the sequence
    // stays duplicate-free and keeps selection order.
    let cfg = ConfigFileBuilder::new().with_entry_page("main.js").build();
    let fs = MockFileSystem::new();

    let sequence = select_tasks(
        &changed("main.js"),
        &fs,
        Path::new("."),
        cfg.project(),
        &ScriptFileList::new(),
    );

    assert_eq!(sequence.ids(), vec!["lint", "reread-entry-scripts"]);
}

#[test]
fn custom_spec_suffix_is_respected() {
    let cfg = ConfigFileBuilder::new().with_spec_suffix(".test.js").build();
    let fs = MockFileSystem::new();
    fs.add_file("./widget.test.js", "describe()");

    let sequence = select_tasks(
        &changed("widget.js"),
        &fs,
        Path::new("."),
        cfg.project(),
        &ScriptFileList::new(),
    );

    assert_eq!(sequence.ids(), vec!["lint", "test-single-spec"]);
}

#[test]
fn spec_path_derivation() {
    assert_eq!(
        spec_path_for(Path::new("foo.js"), "-spec.js"),
        Some(PathBuf::from("foo-spec.js"))
    );
    assert_eq!(
        spec_path_for(Path::new("foo-spec.js"), "-spec.js"),
        Some(PathBuf::from("foo-spec.js"))
    );
    assert_eq!(
        spec_path_for(Path::new("js/nested/bar.js"), "-spec.js"),
        Some(PathBuf::from("js/nested/bar-spec.js"))
    );
    assert_eq!(spec_path_for(Path::new("styles.less"), "-spec.js"), None);
    // Shorter than the suffix: still just a plain suffix check.
    assert_eq!(
        spec_path_for(Path::new("a.js"), "-spec.js"),
        Some(PathBuf::from("a-spec.js"))
    );
}
