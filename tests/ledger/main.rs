mod slot_ledger;

use swapyard::types::{ItemMode, RentalLimits, ShareableItem};

pub fn give_item(id: &str, max_claimers: u32) -> ShareableItem {
    ShareableItem {
        id: id.to_string(),
        owner: "owner".to_string(),
        title: format!("item-{id}"),
        mode: ItemMode::Give,
        price: 0,
        instant_claim: true,
        max_claimers,
        claimed_count: 0,
        available: true,
        rental_limits: RentalLimits::default(),
        created_at: 0,
    }
}
