use rapier3d::prelude::Group;
use serde::{Deserialize, Serialize};

/// Bitmask of collision layers. Bit `n` is layer `n`.
///
/// Serialized as a plain integer so config files can write `ground_layers = 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    // Layers used by the default scene and config.
    pub const GROUND: LayerMask = LayerMask(1 << 0);
    pub const LADDER: LayerMask = LayerMask(1 << 1);
    pub const INTERACTABLE: LayerMask = LayerMask(1 << 2);
    pub const CHARACTER: LayerMask = LayerMask(1 << 3);

    /// Mask containing only layer `index`. Indices past 31 yield an empty mask.
    pub fn layer(index: u32) -> Self {
        LayerMask(1u32.checked_shl(index).unwrap_or(0))
    }

    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }

    /// Rapier interaction group with the same bits.
    pub fn to_group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        self.union(rhs)
    }
}
