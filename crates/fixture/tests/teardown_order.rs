//! Teardown ordering and partial-failure behavior across a whole scope

use std::sync::Arc;

use ephemera_fixture::testing::{DeleteScript, FakeRemote, RemoteCall};
use ephemera_fixture::{Error, FixtureScope, ProvisionOptions};

fn provision_three(scope: &FixtureScope, remote: &Arc<FakeRemote>) -> Vec<String> {
    ["a", "b", "c"]
        .iter()
        .map(|kind| {
            let create_remote = Arc::clone(remote);
            let delete_remote = Arc::clone(remote);
            scope
                .factory()
                .provision(
                    kind,
                    &ProvisionOptions::default(),
                    move |name, _tag| create_remote.create(name),
                    move |id| delete_remote.delete(id),
                )
                .expect("provision")
                .id()
                .to_string()
        })
        .collect()
}

#[test]
fn teardown_runs_once_per_fixture_in_reverse_creation_order() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let remote = Arc::new(FakeRemote::new());
    let scope = FixtureScope::new("lifo");
    let ids = provision_three(&scope, &remote);

    scope.close().expect("clean teardown");

    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(remote.deleted_ids(), expected);
}

#[test]
fn not_found_on_delete_does_not_block_later_entries() {
    let remote = Arc::new(FakeRemote::new());
    let scope = FixtureScope::new("idempotent");
    let ids = provision_three(&scope, &remote);

    // First delete attempted is the last created fixture
    remote.script_delete([DeleteScript::NotFound]);

    scope.close().expect("not-found is success");
    assert_eq!(remote.deleted_ids().len(), ids.len());
}

#[test]
fn middle_failure_is_isolated_and_aggregated() {
    let remote = Arc::new(FakeRemote::new());
    let scope = FixtureScope::new("aggregate");
    let ids = provision_three(&scope, &remote);

    // Drain order is c, b, a — fail the middle entry (b)
    remote.script_delete([DeleteScript::Succeed, DeleteScript::Fail, DeleteScript::Succeed]);

    let err = scope.close().expect_err("aggregate teardown error");
    match err {
        Error::Teardown {
            attempted,
            failures,
        } => {
            assert_eq!(attempted, 3);
            assert_eq!(failures.len(), 1);
            assert!(failures[0].label.starts_with("b "));
        }
        other => panic!("expected Teardown, got {other:?}"),
    }

    // Every delete was still attempted, in reverse creation order.
    let mut expected = ids;
    expected.reverse();
    assert_eq!(remote.deleted_ids(), expected);
}

#[test]
fn dropping_scope_without_close_still_tears_down() {
    let remote = Arc::new(FakeRemote::new());
    {
        let scope = FixtureScope::new("dropped");
        provision_three(&scope, &remote);
    }
    assert_eq!(remote.deleted_ids().len(), 3);
}

#[test]
fn empty_scope_closes_cleanly() {
    let scope = FixtureScope::new("empty");
    assert!(scope.registry().is_empty());
    scope.close().expect("nothing to drain");
}

#[test]
fn creates_precede_deletes_in_call_history() {
    let remote = Arc::new(FakeRemote::new());
    let scope = FixtureScope::new("history");
    provision_three(&scope, &remote);
    scope.close().unwrap();

    let calls = remote.calls();
    let first_delete = calls
        .iter()
        .position(|c| matches!(c, RemoteCall::Delete { .. }))
        .expect("at least one delete");
    assert!(calls[..first_delete]
        .iter()
        .all(|c| matches!(c, RemoteCall::Create { .. })));
}
