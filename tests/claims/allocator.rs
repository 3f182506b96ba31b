use swapyard::{claims::{ClaimAllocator, ClaimStatus}, error::EngineErrorKind};

use super::{admit, give_item};

#[test]
fn given_instant_claim_item_when_admitted_then_claim_is_confirmed() {
    let mut item = give_item("i1", 2, true);

    let claim = admit(&mut item, "c1", "alice", 100, None).expect("claim should be granted");

    assert_eq!(claim.status, ClaimStatus::Confirmed);
    assert_eq!(claim.queue_position, 1);
    assert_eq!(claim.expires_at, None);
    assert_eq!(item.claimed_count, 1);
}

#[test]
fn given_confirmation_gated_item_when_admitted_then_claim_is_pending() {
    let mut item = give_item("i1", 1, false);

    let claim = admit(&mut item, "c1", "alice", 100, Some(3_600))
        .expect("claim should be granted");

    assert_eq!(claim.status, ClaimStatus::Pending);
    assert_eq!(claim.expires_at, Some(3_700));
}

#[test]
fn given_existing_claim_when_claiming_again_then_already_claimed() {
    let mut item = give_item("i1", 2, true);
    let existing = admit(&mut item, "c1", "alice", 100, None).expect("claim should be granted");

    let alice = "alice".to_string();
    let err = ClaimAllocator::admit(&mut item, Some(&existing), "c2".to_string(), &alice, 101, None)
        .expect_err("duplicate claim must fail");

    assert_eq!(err.kind, EngineErrorKind::AlreadyClaimed);
    assert_eq!(item.claimed_count, 1, "rejected claim must not consume a slot");
}

#[test]
fn given_pending_claim_when_owner_confirms_and_completes_then_terminal() {
    let mut item = give_item("i1", 1, false);
    let mut claim = admit(&mut item, "c1", "alice", 100, Some(60)).expect("claim granted");

    let owner = "owner".to_string();
    ClaimAllocator::confirm(&item, &mut claim, &owner).expect("owner confirm should succeed");
    assert_eq!(claim.status, ClaimStatus::Confirmed);
    assert_eq!(claim.expires_at, None, "confirmation clears the deadline");

    ClaimAllocator::complete(&item, &mut claim, &owner).expect("pickup confirm should succeed");
    assert_eq!(claim.status, ClaimStatus::Completed);

    let err = ClaimAllocator::cancel(&mut item, &mut claim, &owner)
        .expect_err("completed claim cannot be cancelled");
    assert_eq!(err.kind, EngineErrorKind::TerminalState);
}

#[test]
fn given_pending_claim_when_stranger_confirms_then_unauthorized() {
    let mut item = give_item("i1", 1, false);
    let mut claim = admit(&mut item, "c1", "alice", 100, None).expect("claim granted");

    let mallory = "mallory".to_string();
    let err = ClaimAllocator::confirm(&item, &mut claim, &mallory)
        .expect_err("non-owner confirm must fail");
    assert_eq!(err.kind, EngineErrorKind::Unauthorized);
}

#[test]
fn given_confirmed_claim_when_owner_confirms_again_then_stale_state() {
    let mut item = give_item("i1", 1, false);
    let mut claim = admit(&mut item, "c1", "alice", 100, None).expect("claim granted");

    let owner = "owner".to_string();
    ClaimAllocator::confirm(&item, &mut claim, &owner).expect("confirm should succeed");
    let err = ClaimAllocator::confirm(&item, &mut claim, &owner)
        .expect_err("second confirm must fail");
    assert_eq!(err.kind, EngineErrorKind::StaleState);
}

#[test]
fn given_cancelled_claim_when_slot_released_then_next_claimant_fits() {
    let mut item = give_item("i1", 1, true);
    let mut claim = admit(&mut item, "c1", "alice", 100, None).expect("claim granted");

    let alice = "alice".to_string();
    ClaimAllocator::cancel(&mut item, &mut claim, &alice).expect("cancel should succeed");
    assert_eq!(claim.status, ClaimStatus::Cancelled);
    assert_eq!(item.claimed_count, 0);

    admit(&mut item, "c2", "bob", 101, None).expect("freed slot should be grantable");
}
