use swapyard::{error::EngineErrorKind, ledger::SlotLedger};

use super::give_item;

#[test]
fn given_free_slots_when_reserving_then_positions_are_sequential() {
    let mut item = give_item("i1", 3);

    let first = SlotLedger::reserve(&mut item).expect("first reserve should succeed");
    let second = SlotLedger::reserve(&mut item).expect("second reserve should succeed");

    assert_eq!(first.queue_position, 1);
    assert_eq!(second.queue_position, 2);
    assert_eq!(item.claimed_count, 2);
}

#[test]
fn given_full_item_when_reserving_then_exhausted() {
    let mut item = give_item("i1", 1);
    SlotLedger::reserve(&mut item).expect("first reserve should succeed");

    let err = SlotLedger::reserve(&mut item).expect_err("second reserve must fail");
    assert_eq!(err.kind, EngineErrorKind::Exhausted);
    assert_eq!(item.claimed_count, 1, "failed reserve must not consume a slot");
}

#[test]
fn given_unavailable_item_when_reserving_then_unavailable() {
    let mut item = give_item("i1", 2);
    SlotLedger::mark_unavailable(&mut item);

    let err = SlotLedger::reserve(&mut item).expect_err("reserve must fail");
    assert_eq!(err.kind, EngineErrorKind::Unavailable);
}

#[test]
fn given_released_slot_when_reserving_again_then_capacity_is_back() {
    let mut item = give_item("i1", 1);
    SlotLedger::reserve(&mut item).expect("reserve should succeed");
    SlotLedger::release(&mut item).expect("release should succeed");

    assert_eq!(item.claimed_count, 0);
    SlotLedger::reserve(&mut item).expect("slot should be reusable after release");
}

#[test]
fn given_empty_item_when_releasing_then_internal_error() {
    let mut item = give_item("i1", 1);
    let err = SlotLedger::release(&mut item).expect_err("release without reserve must fail");
    assert_eq!(err.kind, EngineErrorKind::Internal);
}
