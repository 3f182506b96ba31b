use swapyard::{
    error::EngineErrorKind,
    negotiation::ProposalTerms,
    types::ItemMode,
};

use super::limits;

#[test]
fn given_rental_without_price_when_building_terms_then_validation_error() {
    let err = ProposalTerms::build(ItemMode::Rent, None, Some(5), &limits())
        .expect_err("missing price must fail");
    assert_eq!(err.kind, EngineErrorKind::Validation);
}

#[test]
fn given_rental_days_outside_bounds_when_building_terms_then_validation_error() {
    let err = ProposalTerms::build(ItemMode::Rent, Some(40), Some(31), &limits())
        .expect_err("out-of-range days must fail");
    assert_eq!(err.kind, EngineErrorKind::Validation);

    let err = ProposalTerms::build(ItemMode::Rent, Some(40), Some(0), &limits())
        .expect_err("zero days must fail");
    assert_eq!(err.kind, EngineErrorKind::Validation);
}

#[test]
fn given_sale_when_building_terms_then_days_are_not_carried() {
    let terms = ProposalTerms::build(ItemMode::Sell, Some(80), Some(5), &limits())
        .expect("sale terms should build");
    assert_eq!(terms.price(), 80);
    assert_eq!(terms.rental_days(), None);
}

#[test]
fn given_giveaway_when_building_terms_then_price_is_zero_whatever_was_sent() {
    let terms = ProposalTerms::build(ItemMode::Give, Some(999), None, &limits())
        .expect("giveaway terms should build");
    assert_eq!(terms, ProposalTerms::Give);
    assert_eq!(terms.price(), 0);
}
