mod common;

use std::{path::Path, sync::Arc};

use common::{FakeBackend, MemFs, config};
use ensure_core::{CancelToken, ExitCleanup, FILE_PERMISSIONS};
use ensure_manifest::Package;
use ensure_mockgen::{ConfigError, Error, GenerationFailure, MockGenerator};

fn packages() -> Vec<Package> {
    vec![
        Package::new("github.com/some/pkg/abc", &["Iface1", "Iface2"]),
        Package::new("github.com/my/mod/internal/store", &["Store"]),
        Package::new("github.com/my/mod/sub/internal/db/sql", &["Querier"]),
        Package::new("github.com/other/xyz", &["Doer"]),
    ]
}

fn generator(fs: &Arc<MemFs>, backend: FakeBackend) -> MockGenerator {
    MockGenerator::new(fs.clone(), Arc::new(backend), ExitCleanup::new())
}

#[test]
fn test_generate_writes_every_mock() {
    let fs = Arc::new(MemFs::default());
    let cfg = config(Path::new("/root"), packages());

    let summary = generator(&fs, FakeBackend::default())
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect("generation should succeed");

    let paths: Vec<_> = summary.generated.iter().map(|m| m.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            Path::new("/root/internal/mocks/github.com/some/pkg/mock_abc/mock_abc.go"),
            Path::new("/root/internal/mocks/mock_store/mock_store.go"),
            Path::new("/root/sub/internal/mocks/db/mock_sql/mock_sql.go"),
            Path::new("/root/internal/mocks/github.com/other/mock_xyz/mock_xyz.go"),
        ]
    );
    assert_eq!(
        summary.generated[0].package,
        "github.com/some/pkg/abc: Iface1,Iface2"
    );

    let files = fs.snapshot();
    let (contents, mode) = &files[Path::new("/root/sub/internal/mocks/db/mock_sql/mock_sql.go")];
    assert_eq!(*mode, FILE_PERMISSIONS);
    insta::assert_snapshot!(contents, @r"
    // mock of github.com/my/mod/sub/internal/db/sql (Querier) from /root/sub

    // NEW creates a MockQuerier.
    func (*MockQuerier) NEW(ctrl *gomock.Controller) *MockQuerier {
    	return NewMockQuerier(ctrl)
    }
    ");

    assert!(
        fs.dirs
            .lock()
            .unwrap()
            .contains(Path::new("/root/sub/internal/mocks/db/mock_sql"))
    );
}

#[test]
fn test_sequential_and_concurrent_write_identical_files() {
    let run = |disable_parallel: bool| {
        let fs = Arc::new(MemFs::default());
        let mut cfg = config(Path::new("/root"), packages());
        cfg.disable_parallel_generation = disable_parallel;

        let summary = generator(&fs, FakeBackend::default())
            .generate_mocks(&CancelToken::new(), &cfg)
            .expect("generation should succeed");
        (summary, fs.snapshot())
    };

    let (sequential_summary, sequential_files) = run(true);
    let (concurrent_summary, concurrent_files) = run(false);

    assert_eq!(sequential_files.len(), 4);
    assert_eq!(sequential_files, concurrent_files);
    assert_eq!(sequential_summary, concurrent_summary);
}

#[test]
fn test_sequential_and_concurrent_report_identical_failures() {
    let failing = ["github.com/some/pkg/abc", "github.com/other/xyz"];
    let run = |disable_parallel: bool| {
        let fs = Arc::new(MemFs::default());
        let mut cfg = config(Path::new("/root"), packages());
        cfg.disable_parallel_generation = disable_parallel;

        let err = generator(&fs, FakeBackend::failing(&failing))
            .generate_mocks(&CancelToken::new(), &cfg)
            .expect_err("generation should fail");
        (err.to_string(), fs.snapshot())
    };

    let (sequential_err, sequential_files) = run(true);
    let (concurrent_err, concurrent_files) = run(false);

    assert_eq!(sequential_err, concurrent_err);
    assert_eq!(sequential_files, concurrent_files);
    assert_eq!(sequential_files.len(), 2);
    insta::assert_snapshot!(sequential_err, @r"
    unable to generate at least one mock:
     - could not generate mock for 'github.com/some/pkg/abc: Iface1,Iface2': mockgen: cannot load github.com/some/pkg/abc
     - could not generate mock for 'github.com/other/xyz: Doer': mockgen: cannot load github.com/other/xyz
    ");
}

#[test]
fn test_failure_does_not_stop_other_packages() {
    let fs = Arc::new(MemFs::default());
    let cfg = config(
        Path::new("/root"),
        vec![
            Package::new("github.com/pkg/a", &["A"]),
            Package::new("github.com/pkg/b", &["B"]),
        ],
    );

    let err = generator(&fs, FakeBackend::failing(&["github.com/pkg/a"]))
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect_err("package a should fail");

    let Error::GenerationFailed { failures } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].package(), "github.com/pkg/a: A");

    let files = fs.snapshot();
    assert_eq!(files.len(), 1);
    let (contents, _) = &files[Path::new("/root/internal/mocks/github.com/pkg/mock_b/mock_b.go")];
    assert!(contents.starts_with("// mock of github.com/pkg/b (B) from /root\n"));
}

#[test]
fn test_write_failure_is_reported_with_path() {
    let target = "/root/internal/mocks/github.com/pkg/mock_a/mock_a.go";
    let fs = Arc::new(MemFs::with_failing_write(target));
    let cfg = config(Path::new("/root"), vec![Package::new("github.com/pkg/a", &["A"])]);

    let err = generator(&fs, FakeBackend::default())
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect_err("write should fail");

    assert_eq!(
        err.to_string(),
        format!(
            "unable to generate at least one mock:\n - could not create file '{target}' for 'github.com/pkg/a: A': read-only"
        )
    );
}

#[test]
fn test_directory_failure_is_captured_per_package() {
    let target = "/root/internal/mocks/github.com/pkg/mock_a";
    let fs = Arc::new(MemFs::with_failing_dir(target));
    let cfg = config(
        Path::new("/root"),
        vec![
            Package::new("github.com/pkg/a", &["A"]),
            Package::new("github.com/pkg/b", &["B"]),
        ],
    );

    let err = generator(&fs, FakeBackend::default())
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect_err("creating the directory should fail");

    assert_eq!(
        err.to_string(),
        format!(
            "unable to generate at least one mock:\n - could not create directory '{target}' for 'github.com/pkg/a: A': read-only"
        )
    );
    let Error::GenerationFailed { failures } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(matches!(failures[0], GenerationFailure::CreateDir { .. }));

    let files = fs.snapshot();
    assert_eq!(
        files.keys().collect::<Vec<_>>(),
        vec![Path::new("/root/internal/mocks/github.com/pkg/mock_b/mock_b.go")]
    );
}

#[test]
fn test_cancelled_generation_is_distinguished() {
    let fs = Arc::new(MemFs::default());
    let mut cfg = config(Path::new("/root"), packages());
    cfg.disable_parallel_generation = true;
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = generator(&fs, FakeBackend::default())
        .generate_mocks(&cancel, &cfg)
        .expect_err("cancelled generation should fail");

    let Error::GenerationFailed { failures } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(failures.len(), 4);
    assert!(failures.iter().all(|failure| failure.is_cancelled()));
    assert!(fs.snapshot().is_empty());
}

#[test]
fn test_invalid_config_generates_nothing() {
    let fs = Arc::new(MemFs::default());
    let backend = Arc::new(FakeBackend::default());
    let cfg = config(
        Path::new("/root"),
        vec![
            Package::new("github.com/pkg/a", &["A"]),
            Package::new("github.com/pkg/a", &["B"]),
        ],
    );

    let err = MockGenerator::new(fs.clone(), backend.clone(), ExitCleanup::new())
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect_err("duplicates should be rejected");

    let Error::InvalidConfig { errors } = err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(
        errors,
        vec![ConfigError::DuplicatePackagePath {
            package: "github.com/pkg/a".to_string()
        }]
    );
    assert!(backend.requests.lock().unwrap().is_empty());
    assert!(fs.snapshot().is_empty());
}

#[test]
fn test_backend_runs_in_destination_working_dir() {
    let fs = Arc::new(MemFs::default());
    let backend = Arc::new(FakeBackend::default());
    let mut cfg = config(Path::new("/root"), packages());
    cfg.disable_parallel_generation = true;

    MockGenerator::new(fs, backend.clone(), ExitCleanup::new())
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect("generation should succeed");

    let requests = backend.requests.lock().unwrap();
    let dirs: Vec<_> = requests.iter().map(|r| r.working_dir.as_path()).collect();
    assert_eq!(
        dirs,
        vec![
            Path::new("/root"),
            Path::new("/root"),
            Path::new("/root/sub"),
            Path::new("/root"),
        ]
    );
    assert_eq!(requests[0].interfaces, vec!["Iface1", "Iface2"]);
}

#[test]
fn test_cleanup_runs_only_when_interrupted() {
    let cfg = config(Path::new("/root"), packages());

    let fs = Arc::new(MemFs::default());
    let cleanup = ExitCleanup::new();
    MockGenerator::new(fs.clone(), Arc::new(FakeBackend::default()), cleanup.clone())
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect("generation should succeed");
    assert!(!cleanup.finish());
    assert!(fs.globbed.lock().unwrap().is_empty());

    let fs = Arc::new(MemFs::default());
    let cleanup = ExitCleanup::new();
    MockGenerator::new(fs.clone(), Arc::new(FakeBackend::default()), cleanup.clone())
        .generate_mocks(&CancelToken::new(), &cfg)
        .expect("generation should succeed");
    cleanup.trigger();
    assert!(cleanup.finish());

    let mut globbed = fs.globbed.lock().unwrap().clone();
    globbed.sort();
    assert_eq!(
        globbed,
        vec![
            "/root/gomock_reflect_*".to_string(),
            "/root/sub/gomock_reflect_*".to_string(),
        ]
    );
}
