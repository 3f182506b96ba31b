use swapyard::{
    error::EngineErrorKind,
    lifecycle::{AgreementProposal, TransactionManager, TransactionRequest, TransactionStatus},
    types::ItemMode,
};

use super::{item, open_rental, owner, requester};

#[test]
fn given_rental_request_when_negotiated_and_returned_then_lifecycle_completes() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);
    assert_eq!(tx.status, TransactionStatus::Pending);

    TransactionManager::accept(&mut tx, &rental, &owner(), 101).expect("owner accepts");
    assert_eq!(tx.status, TransactionStatus::Accepted);

    TransactionManager::propose_agreement(
        &mut tx,
        &rental,
        &owner(),
        AgreementProposal {
            price: Some(45),
            rental_days: Some(5),
            start_date: Some(1_000),
            end_date: Some(1_000 + 5 * 86_400),
            terms: Some("return with a full battery".to_string()),
            message: None,
        },
        102,
    )
    .expect("owner proposes agreement");
    assert_eq!(tx.status, TransactionStatus::AgreementProposed);

    let activated = TransactionManager::respond(&mut tx, &rental, &requester(), true, 103)
        .expect("requester confirms");
    assert!(activated);
    assert_eq!(tx.status, TransactionStatus::Active);
    assert_eq!(tx.agreed_price, 45);
    assert_eq!(tx.agreed_rental_days, Some(5));

    TransactionManager::mark_return(&mut tx, &rental, &requester(), 200)
        .expect("requester marks return");
    assert_eq!(tx.status, TransactionStatus::ReturnPending);

    let outcome = TransactionManager::confirm_return(&mut tx, &rental, &owner(), 250)
        .expect("owner confirms return");
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert!(!outcome.late, "returned before the end date");
}

#[test]
fn given_return_after_end_date_when_confirmed_then_marked_late() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);
    TransactionManager::accept(&mut tx, &rental, &owner(), 101).expect("owner accepts");
    TransactionManager::propose_agreement(
        &mut tx,
        &rental,
        &owner(),
        AgreementProposal {
            price: Some(40),
            rental_days: Some(5),
            end_date: Some(500),
            ..AgreementProposal::default()
        },
        102,
    )
    .expect("owner proposes agreement");
    TransactionManager::respond(&mut tx, &rental, &requester(), true, 103)
        .expect("requester confirms");
    TransactionManager::mark_return(&mut tx, &rental, &requester(), 600)
        .expect("requester marks return");

    let outcome = TransactionManager::confirm_return(&mut tx, &rental, &owner(), 601)
        .expect("owner confirms return");
    assert!(outcome.late, "confirmed after the agreed end date");
}

#[test]
fn given_giveaway_transaction_when_activated_then_agreed_price_is_zero() {
    let giveaway = item("i1", ItemMode::Give, 0);
    let mut tx = swapyard::lifecycle::TransactionManager::open(
        "tx-1".to_string(),
        &giveaway,
        &requester(),
        TransactionRequest {
            price: Some(999),
            rental_days: None,
            message: None,
        },
        100,
    )
    .expect("giveaway request should open");

    TransactionManager::accept(&mut tx, &giveaway, &owner(), 101).expect("owner accepts");
    TransactionManager::propose_agreement(
        &mut tx,
        &giveaway,
        &owner(),
        AgreementProposal {
            price: Some(999),
            ..AgreementProposal::default()
        },
        102,
    )
    .expect("owner proposes agreement");
    TransactionManager::respond(&mut tx, &giveaway, &requester(), true, 103)
        .expect("requester confirms");

    assert_eq!(tx.status, TransactionStatus::Active);
    assert_eq!(tx.agreed_price, 0, "giveaways never carry a price");
}

#[test]
fn given_sale_when_handover_confirmed_then_completed() {
    let sale = item("i1", ItemMode::Sell, 80);
    let mut tx = swapyard::lifecycle::TransactionManager::open(
        "tx-1".to_string(),
        &sale,
        &requester(),
        TransactionRequest {
            price: Some(75),
            rental_days: None,
            message: None,
        },
        100,
    )
    .expect("sale request should open");
    TransactionManager::accept(&mut tx, &sale, &owner(), 101).expect("owner accepts");
    TransactionManager::propose_agreement(
        &mut tx,
        &sale,
        &owner(),
        AgreementProposal {
            price: Some(75),
            ..AgreementProposal::default()
        },
        102,
    )
    .expect("owner proposes agreement");
    TransactionManager::respond(&mut tx, &sale, &requester(), true, 103)
        .expect("requester confirms");

    TransactionManager::confirm_handover(&mut tx, &sale, &owner(), 104)
        .expect("owner confirms handover");
    assert_eq!(tx.status, TransactionStatus::Completed);
}

#[test]
fn given_cancelled_transaction_when_accepting_then_terminal_state() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);
    TransactionManager::cancel(&mut tx, &rental, &requester(), 101).expect("requester cancels");

    let err = TransactionManager::accept(&mut tx, &rental, &owner(), 102)
        .expect_err("terminal transaction must reject transitions");
    assert_eq!(err.kind, EngineErrorKind::TerminalState);
    assert_eq!(tx.status, TransactionStatus::Cancelled, "state unchanged");
}

#[test]
fn given_accepted_transaction_when_accepting_again_then_stale_state() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);
    TransactionManager::accept(&mut tx, &rental, &owner(), 101).expect("owner accepts");

    let err = TransactionManager::accept(&mut tx, &rental, &owner(), 102)
        .expect_err("second accept must fail");
    assert_eq!(err.kind, EngineErrorKind::StaleState);
}

#[test]
fn given_stranger_when_accepting_then_unauthorized() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);

    let mallory = "mallory".to_string();
    let err = TransactionManager::accept(&mut tx, &rental, &mallory, 101)
        .expect_err("stranger must not accept");
    assert_eq!(err.kind, EngineErrorKind::Unauthorized);
}

#[test]
fn given_requester_when_accepting_own_request_then_unauthorized() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);

    let err = TransactionManager::accept(&mut tx, &rental, &requester(), 101)
        .expect_err("requester must not accept for the owner");
    assert_eq!(err.kind, EngineErrorKind::Unauthorized);
}

#[test]
fn given_active_rental_when_disputed_then_no_further_transitions() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);
    TransactionManager::accept(&mut tx, &rental, &owner(), 101).expect("owner accepts");
    TransactionManager::propose_agreement(
        &mut tx,
        &rental,
        &owner(),
        AgreementProposal {
            price: Some(40),
            rental_days: Some(5),
            ..AgreementProposal::default()
        },
        102,
    )
    .expect("owner proposes agreement");
    TransactionManager::respond(&mut tx, &rental, &requester(), true, 103)
        .expect("requester confirms");

    TransactionManager::raise_dispute(&mut tx, &rental, &requester(), 104)
        .expect("dispute from active");
    assert_eq!(tx.status, TransactionStatus::Disputed);

    let err = TransactionManager::mark_return(&mut tx, &rental, &requester(), 105)
        .expect_err("disputed transaction is terminal");
    assert_eq!(err.kind, EngineErrorKind::TerminalState);
}

#[test]
fn given_pending_transaction_when_disputed_then_rejected_as_unlisted_transition() {
    let rental = item("i1", ItemMode::Rent, 50);
    let mut tx = open_rental(&rental, 40, 5);

    let err = TransactionManager::raise_dispute(&mut tx, &rental, &requester(), 101)
        .expect_err("dispute applies to active transactions");
    assert_eq!(err.kind, EngineErrorKind::Validation);
}

#[test]
fn given_owner_requesting_own_item_when_opening_then_validation_error() {
    let rental = item("i1", ItemMode::Rent, 50);
    let err = TransactionManager::open(
        "tx-1".to_string(),
        &rental,
        &owner(),
        TransactionRequest {
            price: Some(40),
            rental_days: Some(5),
            message: None,
        },
        100,
    )
    .expect_err("self-request must fail");
    assert_eq!(err.kind, EngineErrorKind::Validation);
}
