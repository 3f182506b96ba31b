use swapyard::{
    lifecycle::{AgreementProposal, TransactionRequest, TransactionStatus},
    lostfound::{MeetupDetails, NewLostFoundPost},
    types::UserId,
};

use super::{default_engine, engine_at, giveaway, rental, user};
use swapyard::config::PolicyConfig;

fn activated_rental(
    engine: &mut swapyard::engine::Engine,
    owner: &UserId,
    requester: &UserId,
    end_date: u64,
) -> String {
    let item = engine
        .create_item(owner, rental(50))
        .expect("item should be created");
    let tx = engine
        .request_item(
            &item.id,
            requester,
            TransactionRequest {
                price: Some(40),
                rental_days: Some(5),
                message: None,
            },
        )
        .expect("request should open");
    engine.accept_request(&tx.id, owner, None).expect("owner accepts");
    engine
        .propose_agreement(
            &tx.id,
            owner,
            AgreementProposal {
                price: Some(40),
                rental_days: Some(5),
                end_date: Some(end_date),
                ..AgreementProposal::default()
            },
            None,
        )
        .expect("owner proposes agreement");
    engine
        .respond_to_proposal(&tx.id, requester, true)
        .expect("requester confirms");
    tx.id
}

#[test]
fn given_on_time_return_when_completed_then_both_parties_gain_trust() {
    let (mut engine, _clock) = default_engine();
    let owner = user("owner");
    let alice = user("alice");
    let tx_id = activated_rental(&mut engine, &owner, &alice, 10_000);

    engine
        .mark_return(&tx_id, &alice, Some(TransactionStatus::Active))
        .expect("requester marks return");
    engine
        .confirm_return(&tx_id, &owner, Some(TransactionStatus::ReturnPending))
        .expect("owner confirms return");

    assert_eq!(engine.trust_score(&owner), 2);
    assert_eq!(engine.trust_score(&alice), 2);
}

#[test]
fn given_late_return_when_confirmed_then_requester_is_penalized() {
    let (mut engine, clock) = default_engine();
    let owner = user("owner");
    let alice = user("alice");
    let tx_id = activated_rental(&mut engine, &owner, &alice, 1_500);

    clock.set(2_000);
    engine
        .mark_return(&tx_id, &alice, None)
        .expect("requester marks return");
    engine
        .confirm_return(&tx_id, &owner, None)
        .expect("owner confirms return");

    assert_eq!(engine.trust_score(&alice), -3, "late return costs the borrower");
    assert_eq!(engine.trust_score(&owner), 2, "the owner is made whole");
}

#[test]
fn given_dispute_when_raised_then_both_parties_lose_trust() {
    let (mut engine, _clock) = default_engine();
    let owner = user("owner");
    let alice = user("alice");
    let tx_id = activated_rental(&mut engine, &owner, &alice, 10_000);

    engine
        .raise_dispute(&tx_id, &alice, Some(TransactionStatus::Active))
        .expect("dispute from active");

    assert_eq!(engine.trust_score(&owner), -1);
    assert_eq!(engine.trust_score(&alice), -1);
}

#[test]
fn given_completed_claim_when_picked_up_then_both_parties_gain_trust() {
    let (mut engine, _clock) = default_engine();
    let owner = user("owner");
    let alice = user("alice");
    let item = engine
        .create_item(&owner, giveaway(1, false))
        .expect("item should be created");
    let claim = engine
        .claim_item(&item.id, &alice)
        .expect("claim should be granted");

    engine
        .confirm_claim(&claim.id, &owner, None)
        .expect("owner confirms");
    engine
        .complete_claim(&claim.id, &owner, None)
        .expect("owner confirms pickup");

    assert_eq!(engine.trust_score(&owner), 1);
    assert_eq!(engine.trust_score(&alice), 1);
}

#[test]
fn given_resolved_lostfound_claim_when_handover_completes_then_both_parties_gain_trust() {
    let (mut engine, _clock) = default_engine();
    let owner = user("owner");
    let alice = user("alice");
    let post = engine
        .create_lostfound_post(
            &owner,
            NewLostFoundPost {
                title: "black umbrella".to_string(),
                verification_questions: Vec::new(),
            },
        )
        .expect("post should be created");
    let claim = engine
        .submit_lostfound_claim(&post.id, &alice, None, Vec::new())
        .expect("claim should submit");

    engine
        .start_verification(&claim.id, &owner, None)
        .expect("verification starts");
    engine
        .approve_verification(&claim.id, &owner, None)
        .expect("owner approves");
    engine
        .propose_meetup(
            &claim.id,
            &owner,
            MeetupDetails {
                location: "student union desk".to_string(),
                date_time: "2026-03-02T12:00".to_string(),
                instructions: None,
            },
        )
        .expect("owner proposes meetup");
    engine
        .accept_meetup(&claim.id, &alice)
        .expect("claimant accepts");
    engine
        .resolve_lostfound_claim(&claim.id, &alice)
        .expect("handover resolves");

    assert_eq!(engine.trust_score(&owner), 2);
    assert_eq!(engine.trust_score(&alice), 2);
}

#[test]
fn given_custom_trust_floor_when_penalties_accumulate_then_score_clamps() {
    let mut policy = PolicyConfig::default();
    policy.trust.floor = -5;
    let (mut engine, _clock) = engine_at(1_000, policy);
    let owner = user("owner");
    let alice = user("alice");

    for _ in 0..4 {
        let tx_id = activated_rental(&mut engine, &owner, &alice, 10_000);
        engine
            .raise_dispute(&tx_id, &alice, None)
            .expect("dispute from active");
    }

    assert_eq!(engine.trust_score(&alice), -4);
    for _ in 0..2 {
        let tx_id = activated_rental(&mut engine, &owner, &alice, 10_000);
        engine
            .raise_dispute(&tx_id, &alice, None)
            .expect("dispute from active");
    }
    assert_eq!(engine.trust_score(&alice), -5, "floor absorbs further penalties");
}
