//! Fault Recovery Tests
//!
//! Validates that backend failures are surfaced to the issuing component
//! only, never move the current path, and clear on a user retry.

use core_types::BucketName;
use identity::{CredentialError, Credentials};
use object_view::VirtualPath;
use services_network::BackendRoute;
use services_notification::ComponentScope;
use services_object_browser::{run_listing, run_preview, BrowserError, CompletionOutcome, NavigationState};
use services_settings::{create_default_registry, keys, persistence, SettingValue};
use sim_backend::{FaultPlan, RouteFault};
use tests_browser::{bootstrap_with_settings, sample_backend, test_bootstrap, ACCESS_KEY, SECRET_KEY};

fn fail_listing(count: usize) -> FaultPlan {
    FaultPlan::new().with_fault(RouteFault::FailNext {
        route: BackendRoute::ListBucketContents,
        count,
        status: 500,
    })
}

/// Failed navigation keeps the user where they were
///
/// This validates that:
/// 1. The failed folder is not entered
/// 2. The error is scoped to the browser
/// 3. Retrying the same action succeeds once the backend recovers
#[test]
fn test_failed_listing_preserves_path_and_retries() {
    let harness = test_bootstrap(sample_backend());
    let mut nav = harness.navigator(harness.sign_in().unwrap());
    let request = nav
        .select_bucket(BucketName::new("analytics").unwrap())
        .unwrap();
    run_listing(&mut nav, &harness.client, request);

    harness.backend.set_fault_plan(fail_listing(1));
    let request = nav.enter_folder("reports").unwrap();
    assert_eq!(
        run_listing(&mut nav, &harness.client, request),
        CompletionOutcome::Failed
    );
    assert_eq!(nav.current_path(), &VirtualPath::root());
    assert!(matches!(
        nav.state(),
        NavigationState::Failed(BrowserError::ListingFailed(_))
    ));
    assert_eq!(harness.notifier.active(ComponentScope::Browser).len(), 1);
    assert!(harness.notifier.active(ComponentScope::Preview).is_empty());

    let request = nav.retry().unwrap();
    assert!(harness.notifier.active(ComponentScope::Browser).is_empty());
    run_listing(&mut nav, &harness.client, request);
    assert_eq!(nav.current_path(), &VirtualPath::parse("/reports/").unwrap());
}

#[test]
fn test_transport_failure_on_first_listing() {
    let backend = sample_backend().with_faults(FaultPlan::new().with_fault(
        RouteFault::DisconnectNext {
            route: BackendRoute::ListBucketContents,
            count: 1,
        },
    ));
    let harness = test_bootstrap(backend);
    let mut nav = harness.navigator(harness.sign_in().unwrap());

    let request = nav
        .select_bucket(BucketName::new("analytics").unwrap())
        .unwrap();
    run_listing(&mut nav, &harness.client, request);
    assert!(nav.render_lines()[1].starts_with("Failed to fetch bucket contents"));

    assert!(nav.bucket().is_none());
    assert!(nav.refresh().is_none());

    let request = nav.retry().unwrap();
    run_listing(&mut nav, &harness.client, request);
    assert!(nav.listing().is_some());
    assert_eq!(nav.bucket().unwrap().as_str(), "analytics");
    assert_eq!(harness.backend.injected_faults(), 1);
}

/// Failed bucket switch
///
/// This validates that:
/// 1. The previous bucket and path stay committed
/// 2. Selecting the same bucket again issues a new request
/// 3. The switch commits, with the path reset, once its listing arrives
#[test]
fn test_failed_bucket_switch_is_repeatable() {
    let harness = test_bootstrap(sample_backend());
    let mut nav = harness.navigator(harness.sign_in().unwrap());
    let request = nav
        .select_bucket(BucketName::new("analytics").unwrap())
        .unwrap();
    run_listing(&mut nav, &harness.client, request);
    let request = nav.enter_folder("reports").unwrap();
    run_listing(&mut nav, &harness.client, request);

    harness.backend.set_fault_plan(fail_listing(1));
    let request = nav.select_bucket(BucketName::new("media").unwrap()).unwrap();
    assert_eq!(
        run_listing(&mut nav, &harness.client, request),
        CompletionOutcome::Failed
    );
    assert_eq!(nav.bucket().unwrap().as_str(), "analytics");
    assert_eq!(nav.current_path(), &VirtualPath::parse("/reports/").unwrap());

    let request = nav
        .select_bucket(BucketName::new("media").unwrap())
        .expect("re-selecting after a failure issues a request");
    assert_eq!(
        run_listing(&mut nav, &harness.client, request),
        CompletionOutcome::Applied
    );
    assert_eq!(nav.bucket().unwrap().as_str(), "media");
    assert_eq!(nav.current_path(), &VirtualPath::root());
}

#[test]
fn test_preview_failure_leaves_navigation_alone() {
    let backend = sample_backend().with_faults(FaultPlan::new().with_fault(
        RouteFault::TimeoutNext {
            route: BackendRoute::QuickPreview,
            count: 1,
        },
    ));
    let harness = test_bootstrap(backend);
    let session = harness.sign_in().unwrap();
    let bucket = BucketName::new("analytics").unwrap();
    let mut nav = harness.navigator(session.clone());
    let mut pane = harness.preview_pane(session);

    let request = nav.select_bucket(bucket.clone()).unwrap();
    run_listing(&mut nav, &harness.client, request);
    let before = nav.listing().unwrap().clone();

    let request = pane.open_key(&bucket, "e.txt");
    assert_eq!(
        run_preview(&mut pane, &harness.client, request),
        CompletionOutcome::Failed
    );
    assert_eq!(nav.listing().unwrap(), &before);
    assert!(harness.notifier.active(ComponentScope::Browser).is_empty());
    assert_eq!(
        harness
            .notifier
            .latest(ComponentScope::Preview)
            .unwrap()
            .message,
        "Failed to fetch file preview"
    );

    let request = pane.open_key(&bucket, "e.txt");
    run_preview(&mut pane, &harness.client, request);
    assert_eq!(pane.preview().unwrap().text, "eeeeeeeeee");
}

#[test]
fn test_unreachable_backend_during_verification() {
    let backend = sample_backend().with_faults(FaultPlan::new().with_fault(
        RouteFault::FailNext {
            route: BackendRoute::VerifyCredentials,
            count: 1,
            status: 503,
        },
    ));
    let harness = test_bootstrap(backend);
    let mut gate = harness.gate();

    let result = harness.verify(&mut gate, Credentials::new(ACCESS_KEY, SECRET_KEY));
    assert!(matches!(result, Err(CredentialError::Unreachable(_))));

    let session = harness
        .verify(&mut gate, Credentials::new(ACCESS_KEY, SECRET_KEY))
        .unwrap();
    assert_eq!(session.credentials().access_key_id(), ACCESS_KEY);
}

#[test]
fn test_persisted_settings_shape_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bucketview.json");

    let mut registry = create_default_registry();
    registry
        .set_override(keys::PREVIEW_MAX_ROWS, SettingValue::Integer(1))
        .unwrap();
    registry
        .set_override(keys::LISTING_DEDUPE_KEYS, SettingValue::Boolean(false))
        .unwrap();
    persistence::save_to_path(&registry, &path).unwrap();

    let mut restored = create_default_registry();
    persistence::load_from_path(&mut restored, &path).unwrap();
    let harness = bootstrap_with_settings(sample_backend(), restored.snapshot().unwrap());

    let session = harness.sign_in().unwrap();
    let mut pane = harness.preview_pane(session);
    let request = pane.open_key(
        &BucketName::new("analytics").unwrap(),
        "reports/2024/sales.csv",
    );
    run_preview(&mut pane, &harness.client, request);
    assert_eq!(pane.preview().unwrap().table.as_ref().unwrap().rows.len(), 1);
}

#[test]
fn test_size_precision_setting_shapes_listing() {
    let mut registry = create_default_registry();
    registry
        .set_override(keys::DISPLAY_SIZE_PRECISION, SettingValue::Integer(1))
        .unwrap();
    let harness = bootstrap_with_settings(sample_backend(), registry.snapshot().unwrap());

    let mut nav = harness.navigator(harness.sign_in().unwrap());
    let request = nav
        .select_bucket(BucketName::new("analytics").unwrap())
        .unwrap();
    run_listing(&mut nav, &harness.client, request);
    let request = nav.enter_folder("a").unwrap();
    run_listing(&mut nav, &harness.client, request);
    assert_eq!(nav.render_lines()[2], "c/  1 items, 50.0 B");
}
