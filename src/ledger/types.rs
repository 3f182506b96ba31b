use serde::{Deserialize, Serialize};

/// Receipt for one successfully reserved claim slot. The position is
/// 1-indexed and fixed at grant time; later releases never renumber it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrant {
    pub queue_position: u32,
}
