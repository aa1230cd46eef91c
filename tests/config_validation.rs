use frontwatch::config::ConfigFile;
use frontwatch::errors::FrontwatchError;
use frontwatch_test_utils::builders::ConfigFileBuilder;

#[test]
fn minimal_config_with_required_steps_is_valid() {
    let raw = ConfigFileBuilder::new().build_raw();

    assert!(ConfigFile::try_from(raw).is_ok());
}

#[test]
fn toml_defaults_round_trip() {
    let raw: frontwatch::config::RawConfigFile = toml::from_str(
        r#"
[step.lint]
cmd = "jshint {files}"

[step.test-single-spec]
cmd = "karma start karma.conf.js {files}"
"#,
    )
    .unwrap();

    let cfg = ConfigFile::try_from(raw).unwrap();
    assert_eq!(cfg.project().entry_page, "index.html");
    assert_eq!(cfg.project().spec_suffix, "-spec.js");
    assert!(cfg
        .project()
        .ignore_dirs
        .contains(&"node_modules".to_string()));
    assert_eq!(
        cfg.watch().file_types,
        vec!["*.js", "*.less", "*.html"]
    );
    assert_eq!(cfg.step_cmd("lint"), Some("jshint {files}"));
}

#[test]
fn missing_lint_step_is_rejected() {
    let mut raw = ConfigFileBuilder::new().build_raw();
    raw.step.remove("lint");

    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, FrontwatchError::ConfigError(_)));
}

#[test]
fn missing_test_step_is_rejected() {
    let mut raw = ConfigFileBuilder::new().build_raw();
    raw.step.remove("test-single-spec");

    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn spec_suffix_must_end_in_js() {
    let raw = ConfigFileBuilder::new()
        .with_spec_suffix("-spec.coffee")
        .build_raw();

    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn empty_entry_page_is_rejected() {
    let raw = ConfigFileBuilder::new().with_entry_page("").build_raw();

    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn empty_file_types_are_rejected() {
    let raw = ConfigFileBuilder::new().with_file_types(&[]).build_raw();

    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn pipeline_referencing_unknown_step_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_pipeline("build", &["lint", "no-such-step"])
        .build_raw();

    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, FrontwatchError::ConfigError(_)));
}

#[test]
fn empty_pipeline_is_rejected() {
    let raw = ConfigFileBuilder::new().with_pipeline("build", &[]).build_raw();

    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn step_and_pipeline_name_collision_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_step("build", "make build")
        .with_pipeline("build", &["lint"])
        .build_raw();

    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn pipeline_cycles_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_pipeline("a", &["b"])
        .with_pipeline("b", &["a"])
        .build_raw();

    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, FrontwatchError::PipelineCycle(_)));
}

#[test]
fn self_referencing_pipeline_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_pipeline("loop", &["loop"])
        .build_raw();

    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn pipeline_may_reference_the_builtin_reread_task() {
    let raw = ConfigFileBuilder::new()
        .with_step("test-all", "karma start --single-run")
        .with_pipeline("test", &["reread-entry-scripts", "test-all"])
        .build_raw();

    assert!(ConfigFile::try_from(raw).is_ok());
}
