//! Debounced carrier resolution and terms gating at the session surface.

use std::time::Duration;

use duma_checkout::{CheckoutConfig, ErrorKind, NetworkResolver, UNKNOWN_CARRIER};

use duma_integration_tests::{RecordingGateway, test_session};

const DEBOUNCE: Duration = Duration::from_millis(400);

// =============================================================================
// Resolver Scenarios
// =============================================================================

#[test]
fn test_national_vodacom_number_resolves() {
    let resolver = NetworkResolver::new();
    let result = resolver.resolve("0821234567");
    assert_eq!(result.carrier, "Vodacom");
    assert!(result.is_valid);
}

#[test]
fn test_country_code_number_is_unknown() {
    // Dropping "27" leaves prefix "831", which is not in the table.
    let resolver = NetworkResolver::new();
    let result = resolver.resolve("27831234567");
    assert_eq!(result.carrier, UNKNOWN_CARRIER);
    assert!(!result.is_valid);
}

#[test]
fn test_resolver_deterministic_across_calls() {
    let resolver = NetworkResolver::new();
    for _ in 0..3 {
        let result = resolver.resolve("084 999 8877");
        assert_eq!(result.carrier, "MTN");
        assert!(result.is_valid);
    }
}

// =============================================================================
// Session Validation Flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_short_input_reports_invalid_format() {
    let gateway = RecordingGateway::approving();
    let session = test_session(&gateway);

    session.phone_input("082");
    let snapshot = session.guard().snapshot();
    assert!(snapshot.result.is_none());
    assert_eq!(
        snapshot.blocking_error(),
        Some(ErrorKind::InvalidPhoneFormat)
    );
}

#[tokio::test(start_paused = true)]
async fn test_unrecognized_carrier_reported_after_detection() {
    let gateway = RecordingGateway::approving();
    let session = test_session(&gateway);

    session.phone_input("0991234567");
    assert_eq!(session.guard().snapshot().blocking_error(), None);

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(
        session.guard().snapshot().blocking_error(),
        Some(ErrorKind::UnrecognizedCarrier)
    );
}

#[tokio::test(start_paused = true)]
async fn test_keystroke_burst_resolves_final_number_only() {
    let gateway = RecordingGateway::approving();
    let session = test_session(&gateway);

    // Typing digit by digit: each change restarts the debounce window.
    for input in ["08212345", "082123456", "0821234567"] {
        session.phone_input(input);
        tokio::time::sleep(DEBOUNCE / 4).await;
    }

    tokio::time::sleep(DEBOUNCE * 2).await;
    let verdict = session.guard().verdict().expect("final verdict");
    assert_eq!(verdict.checked_number, "0821234567");
    assert_eq!(verdict.carrier, "Vodacom");
}

#[tokio::test(start_paused = true)]
async fn test_terms_cannot_be_accepted_for_pending_number() {
    let gateway = RecordingGateway::approving();
    let session = test_session(&gateway);

    session.phone_input("0821234567");
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert!(session.accept_sa_terms());

    // A fresh number puts the session back into detection; acceptance is
    // refused until its verdict arrives.
    session.phone_input("0837654321");
    assert!(!session.accept_sa_terms());
    assert!(!session.can_submit_purchase());

    tokio::time::sleep(DEBOUNCE * 2).await;
    assert!(session.accept_sa_terms());
    assert!(session.can_submit_purchase());
}

#[tokio::test(start_paused = true)]
async fn test_same_number_reformatted_is_not_a_change() {
    let gateway = RecordingGateway::approving();
    let session = test_session(&gateway);

    session.phone_input("0821234567");
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert!(session.accept_sa_terms());

    session.phone_input("(082) 123-4567");
    assert!(session.can_submit_purchase());
}
