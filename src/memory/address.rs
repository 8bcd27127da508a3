// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    pub const fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn checked_add(&self, delta: u64) -> Option<Self> {
        self.value.checked_add(delta).map(Self::new)
    }

    /// Distance from `base` up to `self`, or `None` when `self` lies below `base`.
    pub fn offset_from(&self, base: Address) -> Option<u64> {
        self.value.checked_sub(base.value)
    }

    pub fn align_down(&self, alignment: u64) -> Self {
        Self { value: self.value & !(alignment - 1) }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        Self { value: self.value + rhs }
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from() {
        let base = Address::new(0x1000);
        assert_eq!(Address::new(0x1800).offset_from(base), Some(0x800));
        assert_eq!(Address::new(0x0800).offset_from(base), None);
    }

    #[test]
    fn test_checked_add_overflow() {
        assert!(Address::new(u64::MAX).checked_add(1).is_none());
        assert_eq!(format!("{}", Address::new(0x10)), "0x0000000000000010");
    }
}
