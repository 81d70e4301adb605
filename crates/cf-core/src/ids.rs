use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier handed out for each flow device attached to a network.
///
/// `NonZero` keeps `Option<DeviceId>` the same size as `DeviceId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(NonZeroU32);

impl DeviceId {
    /// Create an id from a 0-based slot index by storing index+1.
    ///
    /// Returns `None` only for `u32::MAX`, which has no successor.
    pub fn from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Recover the 0-based slot index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.index())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}
