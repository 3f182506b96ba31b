use std::collections::BTreeMap;

use crate::{
    trust::types::{TrustAdjustment, TrustConfig, TrustOutcome, TrustRecord},
    types::{UnixSeconds, UserId},
};

/// Reputation scores per user. Deltas come from the configured table and
/// the running score clamps to the configured range; the adjustment list
/// is the append-only audit trail.
#[derive(Debug, Clone)]
pub struct TrustBook {
    config: TrustConfig,
    records: BTreeMap<UserId, TrustRecord>,
}

impl TrustBook {
    pub fn new(config: TrustConfig) -> Self {
        Self {
            config,
            records: BTreeMap::new(),
        }
    }

    pub fn apply(
        &mut self,
        user: &UserId,
        outcome: TrustOutcome,
        entity_id: &str,
        at: UnixSeconds,
    ) -> i64 {
        let delta = self.config.delta_for(outcome);
        let record = self
            .records
            .entry(user.clone())
            .or_insert_with(|| TrustRecord {
                user: user.clone(),
                score: 0,
                adjustments: Vec::new(),
            });

        record.score = record
            .score
            .saturating_add(delta)
            .clamp(self.config.floor, self.config.ceiling);
        record.adjustments.push(TrustAdjustment {
            delta,
            outcome,
            entity_id: entity_id.to_string(),
            at,
        });
        record.score
    }

    pub fn score(&self, user: &UserId) -> i64 {
        self.records.get(user).map(|r| r.score).unwrap_or(0)
    }

    pub fn record(&self, user: &UserId) -> Option<&TrustRecord> {
        self.records.get(user)
    }
}

impl Default for TrustBook {
    fn default() -> Self {
        Self::new(TrustConfig::default())
    }
}
