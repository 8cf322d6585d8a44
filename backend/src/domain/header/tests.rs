//! Regression coverage for this module.

use std::time::Duration;

use super::*;
use crate::domain::auth_controller::{AuthPorts, DemoAccount};
use crate::domain::ports::{KeyValueStore, MockConfirmation, MockHeaderMount};
use crate::domain::session_events::SessionEvents;
use crate::domain::{IdentityDirectory, Session};
use crate::outbound::simulated_backend::{LatencyProfile, SimulatedAuthBackend};
use crate::outbound::storage::SharedMemoryStorage;
use crate::test_support::{
    RecordingHeaderMount, RecordingNavigator, RecordingNotifier, ScriptedConfirmation,
    fixture_clock,
};
use chrono::Utc;
use rstest::{fixture, rstest};

struct Page {
    controller: AuthController,
    store: Arc<dyn KeyValueStore>,
    mount: Arc<RecordingHeaderMount>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
}

fn open_page(origin: &SharedMemoryStorage) -> Page {
    let store: Arc<dyn KeyValueStore> = Arc::new(origin.open_context());
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let backend = SimulatedAuthBackend::new(
        IdentityDirectory::new(Arc::clone(&store)),
        LatencyProfile::instant(),
    );
    let ports = AuthPorts {
        backend: Arc::new(backend),
        navigator: navigator.clone(),
        notifier: notifier.clone(),
        clock: fixture_clock(),
    };
    Page {
        controller: AuthController::new(Arc::clone(&store), SessionEvents::default(), ports),
        store,
        mount: Arc::new(RecordingHeaderMount::default()),
        navigator,
        notifier,
    }
}

#[fixture]
fn origin() -> SharedMemoryStorage {
    SharedMemoryStorage::new()
}

fn admin_view() -> HeaderView {
    HeaderView::Member {
        name: "Administrator 01".to_owned(),
        role: Role::Admin,
    }
}

#[rstest]
fn member_views_list_profile_and_logout() {
    let session = Session::for_account(
        &crate::domain::administrator_account(
            &crate::domain::AccountId::new("admin01").expect("id"),
        )
        .expect("admin"),
        Utc::now(),
    );
    let view = HeaderView::for_session(Some(&session));
    assert_eq!(view, admin_view());
    assert_eq!(view.actions(), &[HeaderAction::Profile, HeaderAction::Logout]);
    assert_eq!(view.greeting().as_deref(), Some("Administrator 01 (Admin)"));
    assert_eq!(HeaderAction::Logout.target(), None);
    assert_eq!(HeaderAction::Login.target(), Some(Surface::Login));
}

#[rstest]
fn construction_renders_the_guest_header(origin: SharedMemoryStorage) {
    let page = open_page(&origin);
    let mut mount = MockHeaderMount::new();
    mount
        .expect_mount()
        .withf(|view| *view == HeaderView::Guest)
        .times(1)
        .return_const(());

    let _sync = HeaderSync::new(&page.controller, Some(Arc::new(mount)));
}

#[rstest]
fn missing_mount_point_is_a_no_op(origin: SharedMemoryStorage) {
    let page = open_page(&origin);
    let sync = HeaderSync::new(&page.controller, None);
    sync.render();
    assert_eq!(sync.view(), HeaderView::Guest);
}

#[rstest]
#[tokio::test]
async fn in_page_login_re_renders(origin: SharedMemoryStorage) {
    let page = open_page(&origin);
    let mut sync = HeaderSync::new(&page.controller, Some(page.mount.clone()));

    page.controller.quick_login(DemoAccount::Admin).await;
    let reaction = sync.process_next().await;

    assert_eq!(reaction, Some(HeaderReaction::Rendered));
    assert_eq!(page.mount.views(), vec![HeaderView::Guest, admin_view()]);
}

#[rstest]
#[tokio::test]
async fn other_context_logout_re_renders(origin: SharedMemoryStorage) {
    let watching = open_page(&origin);
    let acting = open_page(&origin);
    acting.controller.quick_login(DemoAccount::Admin).await;
    let mut sync = HeaderSync::new(&watching.controller, Some(watching.mount.clone()));
    assert_eq!(watching.mount.current(), Some(admin_view()));

    acting.controller.logout().expect("logout");

    assert_eq!(sync.process_next().await, Some(HeaderReaction::Rendered));
    assert_eq!(watching.mount.current(), Some(HeaderView::Guest));
}

#[rstest]
#[tokio::test]
async fn unrelated_storage_keys_are_ignored(origin: SharedMemoryStorage) {
    let watching = open_page(&origin);
    let acting = open_page(&origin);
    let mut sync = HeaderSync::new(&watching.controller, Some(watching.mount.clone()));

    acting.store.set("mivoWishlist", "[\"biogas\"]").expect("set");

    assert_eq!(sync.process_next().await, Some(HeaderReaction::Ignored));
    assert_eq!(watching.mount.views(), vec![HeaderView::Guest]);
}

#[rstest]
fn declined_logout_changes_nothing(origin: SharedMemoryStorage) {
    let page = open_page(&origin);
    page.store.set("isLoggedIn", "true").expect("set");
    let sync = HeaderSync::new(&page.controller, Some(page.mount.clone()));
    let mut confirmation = MockConfirmation::new();
    confirmation
        .expect_confirm()
        .withf(|prompt| prompt == LOGOUT_PROMPT)
        .times(1)
        .return_const(false);

    assert!(!sync.logout(&page.controller, &confirmation));

    assert!(page.controller.existing_session().is_some());
    assert!(page.notifier.notifications().is_empty());
    assert!(page.navigator.navigations().is_empty());
}

#[rstest]
#[tokio::test]
async fn confirmed_logout_notifies_and_leaves(origin: SharedMemoryStorage) {
    let page = open_page(&origin);
    page.controller.quick_login(DemoAccount::Admin).await;
    let sync = HeaderSync::new(&page.controller, Some(page.mount.clone()));
    let confirmation = ScriptedConfirmation::always(true);

    assert!(sync.logout(&page.controller, &confirmation));

    assert!(page.controller.existing_session().is_none());
    assert_eq!(page.mount.current(), Some(HeaderView::Guest));
    assert_eq!(
        page.notifier.last(),
        Some(Notification::success(LOGGED_OUT_MESSAGE))
    );
    assert_eq!(
        page.navigator.navigations().last(),
        Some(&(Surface::Landing, Duration::from_millis(1000)))
    );
    assert_eq!(confirmation.prompts(), vec![LOGOUT_PROMPT.to_owned()]);
}

#[rstest]
#[tokio::test]
async fn run_stops_once_the_context_closes() {
    let origin = SharedMemoryStorage::new();
    let page = open_page(&origin);
    let sync = HeaderSync::new(&page.controller, Some(page.mount.clone()));
    let mount = page.mount.clone();
    drop(page);
    drop(origin);

    sync.run().await;

    assert_eq!(mount.views(), vec![HeaderView::Guest]);
}
