//! Regression coverage for this module.

use std::time::Duration;

use super::*;
use crate::domain::ports::{BackendError, MockAuthBackend, MockConfirmation, Severity};
use crate::domain::session_events::SessionChanged;
use crate::outbound::simulated_backend::{LatencyProfile, SimulatedAuthBackend};
use crate::outbound::storage::SharedMemoryStorage;
use crate::test_support::{RecordingNavigator, RecordingNotifier, fixture_clock};
use rstest::{fixture, rstest};
use zeroize::Zeroizing;

struct Harness {
    controller: AuthController,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
    events: SessionEvents,
}

fn harness_with(store: Arc<dyn KeyValueStore>, backend: Arc<dyn AuthBackend>) -> Harness {
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let events = SessionEvents::default();
    let ports = AuthPorts {
        backend,
        navigator: navigator.clone(),
        notifier: notifier.clone(),
        clock: fixture_clock(),
    };
    Harness {
        controller: AuthController::new(store, events.clone(), ports),
        navigator,
        notifier,
        events,
    }
}

fn simulated(latency: LatencyProfile) -> Harness {
    let store: Arc<dyn KeyValueStore> = Arc::new(SharedMemoryStorage::new().open_context());
    let backend = SimulatedAuthBackend::new(IdentityDirectory::new(Arc::clone(&store)), latency);
    harness_with(store, Arc::new(backend))
}

#[fixture]
fn harness() -> Harness {
    simulated(LatencyProfile::instant())
}

fn signup_form(id: &str) -> SignupForm {
    SignupForm {
        user_id: id.to_owned(),
        full_name: "Sari Laut".to_owned(),
        email: "sari@mivo.id".to_owned(),
        role: "Pengguna".to_owned(),
        password: Zeroizing::new("rahasia1".to_owned()),
        confirm_password: Zeroizing::new("rahasia1".to_owned()),
        agree_terms: true,
        ..SignupForm::default()
    }
}

#[rstest]
#[tokio::test]
async fn signup_then_login_is_case_insensitive(harness: Harness) {
    let registered = harness.controller.signup(&signup_form("pengguna01")).await;
    assert!(matches!(registered, SignupOutcome::Registered(ref account) if account.id().as_ref() == "pengguna01"));
    assert!(harness.controller.existing_session().is_none());
    assert_eq!(
        harness.navigator.navigations(),
        vec![(Surface::Login, Duration::from_millis(2000))]
    );

    let LoginOutcome::Success(session) = harness.controller.login("PENGGUNA01").await else {
        panic!("expected a successful login");
    };
    assert_eq!(session.role(), Role::Pengguna);
    assert_eq!(session.user_id(), "pengguna01");
    assert_eq!(session.user_name(), "Sari Laut");
    assert_eq!(harness.controller.existing_session(), Some(session));
    assert_eq!(
        harness.navigator.navigations().last(),
        Some(&(Surface::Profile, Duration::from_millis(1500)))
    );
}

#[rstest]
#[tokio::test]
async fn administrators_log_in_without_registering(harness: Harness) {
    let mut subscription = harness.events.subscribe();

    let outcome = harness.controller.quick_login(DemoAccount::Admin).await;

    let LoginOutcome::Success(session) = outcome else {
        panic!("expected a successful login");
    };
    assert_eq!(session.role(), Role::Admin);
    assert!(session.user_name().contains("01"));
    assert!(session.logged_in_at().is_some());
    assert_eq!(subscription.try_recv(), Some(SessionChanged));
    assert_eq!(
        harness.navigator.navigations(),
        vec![(Surface::Admin, Duration::from_millis(1500))]
    );
    let last = harness.notifier.last().expect("welcome toast");
    assert_eq!(last.severity, Severity::Success);
    assert_eq!(last.message, "Welcome, Administrator 01!");
}

#[rstest]
#[tokio::test]
async fn blank_login_is_rejected_before_the_backend(harness: Harness) {
    let outcome = harness.controller.login("   ").await;
    assert_eq!(
        outcome,
        LoginOutcome::Rejected(FieldError::new(FormField::LoginId, FieldErrorReason::Required))
    );
    assert!(harness.notifier.notifications().is_empty());
}

#[rstest]
#[tokio::test]
async fn short_password_is_rejected_without_storing(harness: Harness) {
    let mut form = signup_form("shortpw");
    form.password = Zeroizing::new("abc".to_owned());
    form.confirm_password = Zeroizing::new("abc".to_owned());

    let outcome = harness.controller.signup(&form).await;

    let SignupOutcome::Rejected(errors) = outcome else {
        panic!("expected validation errors");
    };
    assert_eq!(
        errors,
        vec![FieldError::new(
            FormField::Password,
            FieldErrorReason::PasswordTooShort
        )]
    );
    let id = AccountId::new("shortpw").expect("id");
    assert!(!harness.controller.directory().exists(&id).expect("lookup"));
    assert!(!harness.controller.signup_in_flight());
}

#[rstest]
#[tokio::test]
async fn back_to_back_signups_keep_a_single_entry(harness: Harness) {
    let first = harness.controller.signup(&signup_form("dupuser")).await;
    assert!(matches!(first, SignupOutcome::Registered(_)));

    let second = harness.controller.signup(&signup_form("DupUser")).await;
    let SignupOutcome::Rejected(errors) = second else {
        panic!("expected the id to be reported as taken");
    };
    assert_eq!(
        errors,
        vec![FieldError::new(FormField::SignupId, FieldErrorReason::IdTaken)]
    );

    let accounts = harness.controller.directory().accounts().expect("accounts");
    let matching = accounts
        .iter()
        .filter(|account| account.id().as_ref() == "dupuser")
        .count();
    assert_eq!(matching, 1);
}

#[rstest]
#[tokio::test]
async fn administrator_ids_cannot_be_registered(harness: Harness) {
    let outcome = harness.controller.signup(&signup_form("admin05")).await;
    assert!(matches!(outcome, SignupOutcome::Rejected(ref errors)
        if errors == &vec![FieldError::new(FormField::SignupId, FieldErrorReason::IdTaken)]));
}

#[rstest]
#[tokio::test]
async fn registration_race_reports_duplicate() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SharedMemoryStorage::new().open_context());
    let mut backend = MockAuthBackend::new();
    backend.expect_register().times(1).returning(|account| {
        Err(RegistrationError::DuplicateId {
            id: account.id().clone(),
        })
    });
    let harness = harness_with(store, Arc::new(backend));

    let outcome = harness.controller.signup(&signup_form("racer")).await;

    assert_eq!(
        outcome,
        SignupOutcome::Duplicate {
            id: AccountId::new("racer").expect("id")
        }
    );
    assert_eq!(harness.notifier.messages(), vec![DUPLICATE_MESSAGE.to_owned()]);
    assert!(harness.navigator.navigations().is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_login_offers_signup_and_keeps_the_session(harness: Harness) {
    harness.controller.quick_login(DemoAccount::Admin).await;
    let before = harness.controller.existing_session();
    let mut subscription = harness.events.subscribe();

    let outcome = harness.controller.login("ghost").await;

    assert_eq!(
        outcome,
        LoginOutcome::NotFound {
            id: AccountId::new("ghost").expect("id")
        }
    );
    assert_eq!(harness.controller.existing_session(), before);
    assert_eq!(subscription.try_recv(), None);
    assert_eq!(
        harness.navigator.offers(),
        vec![NavigationOffer {
            prompt: NOT_FOUND_PROMPT.to_owned(),
            target: Surface::Signup,
            delay: Duration::from_millis(1000),
        }]
    );
    let last = harness.notifier.last().expect("error toast");
    assert_eq!(last, Notification::error(NOT_FOUND_MESSAGE));
}

#[rstest]
#[tokio::test]
async fn logout_without_a_session_still_publishes(harness: Harness) {
    let mut subscription = harness.events.subscribe();

    harness.controller.logout().expect("logout");

    assert!(harness.controller.existing_session().is_none());
    assert_eq!(subscription.try_recv(), Some(SessionChanged));
}

#[rstest]
#[tokio::test]
async fn logout_clears_an_existing_session(harness: Harness) {
    harness.controller.quick_login(DemoAccount::Admin).await;
    assert!(harness.controller.existing_session().is_some());

    harness.controller.logout().expect("logout");

    assert!(harness.controller.existing_session().is_none());
}

#[tokio::test(start_paused = true)]
async fn concurrent_logins_report_busy() {
    let harness = simulated(LatencyProfile::default());

    let (first, second) = tokio::join!(
        harness.controller.login("admin01"),
        harness.controller.login("admin02"),
    );

    assert!(matches!(first, LoginOutcome::Success(_)));
    assert_eq!(second, LoginOutcome::Busy);
    assert!(!harness.controller.login_in_flight());
}

#[tokio::test(start_paused = true)]
async fn concurrent_signups_report_busy() {
    let harness = simulated(LatencyProfile::default());
    let first_form = signup_form("firstuser");
    let second_form = signup_form("seconduser");

    let (first, second) = tokio::join!(
        harness.controller.signup(&first_form),
        harness.controller.signup(&second_form),
    );

    assert!(matches!(first, SignupOutcome::Registered(_)));
    assert_eq!(second, SignupOutcome::Busy);
}

#[rstest]
#[tokio::test]
async fn backend_failure_releases_the_latch() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SharedMemoryStorage::new().open_context());
    let mut backend = MockAuthBackend::new();
    backend
        .expect_authenticate()
        .times(2)
        .returning(|_| Err(BackendError::unavailable("timeout")));
    let harness = harness_with(store, Arc::new(backend));

    assert_eq!(harness.controller.login("admin01").await, LoginOutcome::Failed);
    assert!(!harness.controller.login_in_flight());
    assert_eq!(harness.controller.login("admin01").await, LoginOutcome::Failed);
    assert!(harness.controller.existing_session().is_none());
    assert_eq!(
        harness.notifier.last(),
        Some(Notification::error(LOGIN_FAILED_MESSAGE))
    );
}

#[rstest]
#[tokio::test]
async fn signup_backend_failure_notifies() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SharedMemoryStorage::new().open_context());
    let mut backend = MockAuthBackend::new();
    backend
        .expect_register()
        .returning(|_| Err(RegistrationError::Backend(BackendError::unavailable("down"))));
    let failing = harness_with(store, Arc::new(backend));

    let outcome = failing.controller.signup(&signup_form("pengguna09")).await;

    assert_eq!(outcome, SignupOutcome::Failed);
    assert!(!failing.controller.signup_in_flight());
    assert_eq!(
        failing.notifier.last(),
        Some(Notification::error(SIGNUP_FAILED_MESSAGE))
    );
}

#[rstest]
#[case(true, true)]
#[case(false, false)]
#[tokio::test]
async fn resume_offer_follows_the_answer(
    harness: Harness,
    #[case] answer: bool,
    #[case] navigated: bool,
) {
    harness.controller.quick_login(DemoAccount::Admin).await;
    let before = harness.navigator.navigations().len();
    let mut confirmation = MockConfirmation::new();
    confirmation
        .expect_confirm()
        .withf(|prompt| prompt.contains("Administrator 01"))
        .times(1)
        .return_const(answer);

    assert_eq!(harness.controller.offer_resume(&confirmation), navigated);

    let after = harness.navigator.navigations();
    assert_eq!(after.len() - before, usize::from(navigated));
    if navigated {
        assert_eq!(after.last(), Some(&(Surface::Profile, Duration::ZERO)));
    }
}

#[rstest]
fn resume_is_not_offered_to_guests(harness: Harness) {
    let mut confirmation = MockConfirmation::new();
    confirmation.expect_confirm().never();
    assert!(!harness.controller.offer_resume(&confirmation));
}

#[rstest]
fn latch_releases_on_drop() {
    let latch = SubmitLatch::default();
    let guard = latch.try_engage().expect("free latch");
    assert!(latch.is_engaged());
    assert!(latch.try_engage().is_none());
    drop(guard);
    assert!(!latch.is_engaged());
}

#[rstest]
fn demo_accounts_are_listed_in_order() {
    let ids: Vec<_> = DemoAccount::ALL.iter().map(DemoAccount::id).collect();
    assert_eq!(ids, vec!["admin01", "pengguna01"]);
}
