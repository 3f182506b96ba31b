use crate::{
    engine::store::EntityStore,
    error::{EngineResult, internal_error},
    lostfound::{LostFoundClaimStatus, PostStatus},
    types::ItemMode,
};

/// Slot accounting must line up exactly: every non-cancelled claim holds
/// one slot, and no item ever has more slots out than its ceiling.
pub fn assert_slot_accounting(store: &EntityStore) -> EngineResult<()> {
    for item in store.items.values() {
        let live = store
            .claims_for_item(&item.id)
            .filter(|c| c.status.holds_slot())
            .count() as u32;

        if live != item.claimed_count {
            return Err(internal_error(format!(
                "item '{}' claimed_count {} disagrees with {} live claims",
                item.id, item.claimed_count, live
            )));
        }
        if item.claimed_count > item.max_claimers {
            return Err(internal_error(format!(
                "item '{}' has {} slots out, ceiling is {}",
                item.id, item.claimed_count, item.max_claimers
            )));
        }
    }
    Ok(())
}

/// A resolved post has exactly one resolved claim and no claim still in
/// flight; an open post has none resolved.
pub fn assert_resolution_exclusivity(store: &EntityStore) -> EngineResult<()> {
    for post in store.posts.values() {
        let resolved = store
            .lostfound_claims_for_post(&post.id)
            .filter(|c| c.status == LostFoundClaimStatus::Resolved)
            .count();
        let in_flight = store
            .lostfound_claims_for_post(&post.id)
            .filter(|c| !c.status.is_terminal())
            .count();

        match post.status {
            PostStatus::Open => {
                if resolved != 0 {
                    return Err(internal_error(format!(
                        "open post '{}' has {} resolved claims",
                        post.id, resolved
                    )));
                }
            }
            PostStatus::Resolved => {
                if resolved != 1 {
                    return Err(internal_error(format!(
                        "resolved post '{}' has {} resolved claims",
                        post.id, resolved
                    )));
                }
                if in_flight != 0 {
                    return Err(internal_error(format!(
                        "resolved post '{}' still has {} claims in flight",
                        post.id, in_flight
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Giveaway transactions never carry a price, whatever was proposed.
pub fn assert_giveaway_prices(store: &EntityStore) -> EngineResult<()> {
    for tx in store.transactions.values() {
        let Some(item) = store.items.get(&tx.item_id) else {
            continue;
        };
        if item.mode == ItemMode::Give && tx.agreed_price != 0 {
            return Err(internal_error(format!(
                "giveaway transaction '{}' carries agreed_price {}",
                tx.id, tx.agreed_price
            )));
        }
    }
    Ok(())
}
