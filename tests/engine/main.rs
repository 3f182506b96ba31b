mod trust_scores;

use std::sync::Arc;

use swapyard::{
    clock::FixedClock,
    config::PolicyConfig,
    engine::Engine,
    types::{ItemMode, NewItem, RentalLimits, UserId},
};

pub fn user(name: &str) -> UserId {
    name.to_string()
}

pub fn engine_at(start: u64, policy: PolicyConfig) -> (Engine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::at(start));
    let engine = Engine::new(policy, clock.clone());
    (engine, clock)
}

pub fn default_engine() -> (Engine, Arc<FixedClock>) {
    engine_at(1_000, PolicyConfig::default())
}

pub fn giveaway(max_claimers: u32, instant_claim: bool) -> NewItem {
    NewItem {
        title: "spare desk chair".to_string(),
        mode: ItemMode::Give,
        price: 0,
        instant_claim,
        max_claimers,
        rental_limits: RentalLimits::default(),
    }
}

pub fn rental(price: u64) -> NewItem {
    NewItem {
        title: "camping tent".to_string(),
        mode: ItemMode::Rent,
        price,
        instant_claim: false,
        max_claimers: 1,
        rental_limits: RentalLimits::default(),
    }
}

pub fn sale(price: u64) -> NewItem {
    NewItem {
        title: "desk lamp".to_string(),
        mode: ItemMode::Sell,
        price,
        instant_claim: false,
        max_claimers: 1,
        rental_limits: RentalLimits::default(),
    }
}
