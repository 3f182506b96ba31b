use crate::{
    claims::types::{Claim, ClaimStatus},
    error::{EngineResult, already_claimed, stale_state, terminal_state, unauthorized},
    ledger::SlotLedger,
    types::{ClaimId, ShareableItem, UnixSeconds, UserId},
};

/// Converts claim requests into slot grants and drives a claim through its
/// confirmation handshake. The slot reservation and the Claim record are
/// produced by the same call, so neither can exist without the other.
pub struct ClaimAllocator;

impl ClaimAllocator {
    pub fn admit(
        item: &mut ShareableItem,
        existing: Option<&Claim>,
        claim_id: ClaimId,
        requester: &UserId,
        now: UnixSeconds,
        ttl_secs: Option<u64>,
    ) -> EngineResult<Claim> {
        if let Some(held) = existing {
            return Err(already_claimed(format!(
                "'{}' already holds claim '{}' on item '{}'",
                requester, held.id, item.id
            )));
        }

        let grant = SlotLedger::reserve(item)?;

        let status = if item.instant_claim {
            ClaimStatus::Confirmed
        } else {
            ClaimStatus::Pending
        };
        let expires_at = match (status, ttl_secs) {
            (ClaimStatus::Pending, Some(ttl)) => Some(now.saturating_add(ttl)),
            _ => None,
        };

        Ok(Claim {
            id: claim_id,
            item_id: item.id.clone(),
            requester: requester.clone(),
            status,
            queue_position: grant.queue_position,
            claimed_at: now,
            expires_at,
        })
    }

    /// Owner acceptance, the first of the two confirmations.
    pub fn confirm(item: &ShareableItem, claim: &mut Claim, actor: &UserId) -> EngineResult<()> {
        ensure_from(claim, ClaimStatus::Pending)?;
        if actor != &item.owner {
            return Err(unauthorized(format!(
                "only the owner of item '{}' may confirm claims on it",
                item.id
            )));
        }

        claim.status = ClaimStatus::Confirmed;
        claim.expires_at = None;
        Ok(())
    }

    /// Owner pickup confirmation, the second confirmation. Terminal.
    pub fn complete(item: &ShareableItem, claim: &mut Claim, actor: &UserId) -> EngineResult<()> {
        ensure_from(claim, ClaimStatus::Confirmed)?;
        if actor != &item.owner {
            return Err(unauthorized(format!(
                "only the owner of item '{}' may confirm pickup",
                item.id
            )));
        }

        claim.status = ClaimStatus::Completed;
        Ok(())
    }

    pub fn cancel(item: &mut ShareableItem, claim: &mut Claim, actor: &UserId) -> EngineResult<()> {
        if claim.status.is_terminal() {
            return Err(terminal_state(format!(
                "claim '{}' is already {}",
                claim.id,
                claim.status.as_str()
            )));
        }
        if actor != &claim.requester && actor != &item.owner {
            return Err(unauthorized(format!(
                "'{}' is neither requester nor owner for claim '{}'",
                actor, claim.id
            )));
        }

        claim.status = ClaimStatus::Cancelled;
        SlotLedger::release(item)
    }

    /// TTL sweep step: cancels one pending claim whose deadline passed and
    /// frees its slot. Returns whether the claim expired.
    pub fn expire(
        item: &mut ShareableItem,
        claim: &mut Claim,
        now: UnixSeconds,
    ) -> EngineResult<bool> {
        if claim.status != ClaimStatus::Pending {
            return Ok(false);
        }
        let Some(deadline) = claim.expires_at else {
            return Ok(false);
        };
        if now < deadline {
            return Ok(false);
        }

        claim.status = ClaimStatus::Cancelled;
        SlotLedger::release(item)?;
        Ok(true)
    }
}

fn ensure_from(claim: &Claim, required: ClaimStatus) -> EngineResult<()> {
    if claim.status == required {
        return Ok(());
    }
    if claim.status.is_terminal() {
        return Err(terminal_state(format!(
            "claim '{}' is already {}",
            claim.id,
            claim.status.as_str()
        )));
    }
    Err(stale_state(format!(
        "claim '{}' is {}, expected {}",
        claim.id,
        claim.status.as_str(),
        required.as_str()
    )))
}
