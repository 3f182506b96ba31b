use crate::{
    error::{EngineResult, exhausted, internal_error, unavailable},
    ledger::types::SlotGrant,
    types::ShareableItem,
};

/// Slot accounting for one shareable item. `claimed_count` counts every
/// non-cancelled claim (pending, confirmed or completed) and must never
/// exceed `max_claimers`. Callers hold the engine write lock, so the
/// ceiling check and the increment happen as one step.
pub struct SlotLedger;

impl SlotLedger {
    pub fn reserve(item: &mut ShareableItem) -> EngineResult<SlotGrant> {
        if !item.available {
            return Err(unavailable(format!(
                "item '{}' is no longer available",
                item.id
            )));
        }

        if item.claimed_count >= item.max_claimers {
            return Err(exhausted(format!(
                "item '{}' has no free claim slots ({} of {} taken)",
                item.id, item.claimed_count, item.max_claimers
            )));
        }

        item.claimed_count += 1;
        Ok(SlotGrant {
            queue_position: item.claimed_count,
        })
    }

    pub fn release(item: &mut ShareableItem) -> EngineResult<()> {
        item.claimed_count = item
            .claimed_count
            .checked_sub(1)
            .ok_or_else(|| internal_error(format!("slot underflow on item '{}'", item.id)))?;
        Ok(())
    }

    pub fn mark_unavailable(item: &mut ShareableItem) {
        item.available = false;
    }

    pub fn mark_available(item: &mut ShareableItem) {
        item.available = true;
    }
}
