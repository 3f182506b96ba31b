use std::collections::BTreeMap;

use crate::{
    claims::Claim,
    lifecycle::Transaction,
    lostfound::{LostFoundClaim, LostFoundPost},
    types::{ClaimId, ItemId, LostFoundClaimId, PostId, ShareableItem, TransactionId, WantedId,
        WantedOfferId},
    wanted::{WantedItem, WantedOffer},
};

/// The authoritative entity store. Every entity is an independently
/// addressable record; cross-entity links are ids only.
#[derive(Debug, Default)]
pub struct EntityStore {
    pub items: BTreeMap<ItemId, ShareableItem>,
    pub claims: BTreeMap<ClaimId, Claim>,
    pub transactions: BTreeMap<TransactionId, Transaction>,
    pub posts: BTreeMap<PostId, LostFoundPost>,
    pub lostfound_claims: BTreeMap<LostFoundClaimId, LostFoundClaim>,
    pub wanted_items: BTreeMap<WantedId, WantedItem>,
    pub wanted_offers: BTreeMap<WantedOfferId, WantedOffer>,
}

impl EntityStore {
    pub fn claims_for_item<'a>(&'a self, item_id: &'a str) -> impl Iterator<Item = &'a Claim> {
        self.claims.values().filter(move |c| c.item_id == item_id)
    }

    pub fn lostfound_claims_for_post<'a>(
        &'a self,
        post_id: &'a str,
    ) -> impl Iterator<Item = &'a LostFoundClaim> {
        self.lostfound_claims
            .values()
            .filter(move |c| c.post_id == post_id)
    }

    pub fn offers_for_wanted<'a>(
        &'a self,
        wanted_id: &'a str,
    ) -> impl Iterator<Item = &'a WantedOffer> {
        self.wanted_offers
            .values()
            .filter(move |o| o.wanted_id == wanted_id)
    }

    pub fn transactions_for_item<'a>(
        &'a self,
        item_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> {
        self.transactions
            .values()
            .filter(move |t| t.item_id == item_id)
    }
}
