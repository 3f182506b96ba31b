use crate::{
    error::{EngineResult, terminal_state, unauthorized, validation_error},
    types::{UnixSeconds, UserId, WantedOfferId},
    wanted::types::{NewWantedOffer, WantedItem, WantedOffer, WantedOfferStatus},
};

/// Single-round offer protocol for wanted items. Sibling handling on
/// acceptance is the engine's policy call, not this module's.
pub struct OfferManager;

impl OfferManager {
    pub fn open(
        id: WantedOfferId,
        wanted: &WantedItem,
        offerer: &UserId,
        offer: NewWantedOffer,
        now: UnixSeconds,
    ) -> EngineResult<WantedOffer> {
        if offerer == &wanted.owner {
            return Err(validation_error(format!(
                "'{}' cannot make an offer on their own wanted item '{}'",
                offerer, wanted.id
            )));
        }

        let price = if offer.offer_type.is_priced() {
            offer.price.ok_or_else(|| {
                validation_error("price is required for sell and rent offers")
            })?
        } else {
            0
        };

        Ok(WantedOffer {
            id,
            wanted_id: wanted.id.clone(),
            offerer: offerer.clone(),
            offer_type: offer.offer_type,
            price,
            message: offer.message,
            status: WantedOfferStatus::Pending,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn accept(
        wanted: &WantedItem,
        offer: &mut WantedOffer,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(wanted, actor)?;
        ensure_pending(offer)?;
        offer.status = WantedOfferStatus::Accepted;
        offer.updated_at = now;
        Ok(())
    }

    pub fn reject(
        wanted: &WantedItem,
        offer: &mut WantedOffer,
        actor: &UserId,
        reason: Option<String>,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(wanted, actor)?;
        ensure_pending(offer)?;
        offer.status = WantedOfferStatus::Rejected;
        offer.rejection_reason = reason;
        offer.updated_at = now;
        Ok(())
    }

    pub fn cancel(offer: &mut WantedOffer, actor: &UserId, now: UnixSeconds) -> EngineResult<()> {
        if actor != &offer.offerer {
            return Err(unauthorized(format!(
                "only the offerer may cancel offer '{}'",
                offer.id
            )));
        }
        ensure_pending(offer)?;
        offer.status = WantedOfferStatus::Cancelled;
        offer.updated_at = now;
        Ok(())
    }

    /// Policy-driven close of a pending sibling once another offer was
    /// accepted.
    pub fn close_superseded(offer: &mut WantedOffer, now: UnixSeconds) -> bool {
        if offer.status != WantedOfferStatus::Pending {
            return false;
        }
        offer.status = WantedOfferStatus::Rejected;
        offer.rejection_reason = Some("another offer was accepted".to_string());
        offer.updated_at = now;
        true
    }
}

fn ensure_pending(offer: &WantedOffer) -> EngineResult<()> {
    if offer.status == WantedOfferStatus::Pending {
        Ok(())
    } else {
        Err(terminal_state(format!(
            "offer '{}' is already {}",
            offer.id,
            offer.status.as_str()
        )))
    }
}

fn ensure_owner(wanted: &WantedItem, actor: &UserId) -> EngineResult<()> {
    if actor == &wanted.owner {
        Ok(())
    } else {
        Err(unauthorized(format!(
            "only the owner of wanted item '{}' may act on its offers",
            wanted.id
        )))
    }
}
