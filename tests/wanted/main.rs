
use swapyard::{
    types::UserId,
    wanted::{NewWantedOffer, OfferManager, OfferType, WantedItem, WantedOffer},
};

pub fn owner() -> UserId {
    "owner".to_string()
}

pub fn offerer() -> UserId {
    "bob".to_string()
}

pub fn wanted(id: &str) -> WantedItem {
    WantedItem {
        id: id.to_string(),
        owner: owner(),
        title: "desk lamp".to_string(),
        created_at: 0,
    }
}

pub fn sell_offer(id: &str, wanted: &WantedItem, price: u64) -> WantedOffer {
    OfferManager::open(
        id.to_string(),
        wanted,
        &offerer(),
        NewWantedOffer {
            offer_type: OfferType::Sell,
            price: Some(price),
            message: None,
        },
        100,
    )
    .expect("offer should open")
}
