//! Packed-bit masks.

use std::collections::BTreeMap;

/// Bits per register; mask sequences restart after this many siblings.
pub const MASK_GROUP_SIZE: usize = 16;

/// Mask of the sibling at `index` within its parent: 0x1, 0x2, 0x4... 0x8000, then 0x1 again.
pub fn mask_for(index: usize) -> u16 {
    1u16 << (index % MASK_GROUP_SIZE)
}

/// Mask bits handed out per register.
///
/// Bits reserved up front (dimension children) are skipped when later
/// single-bit records at the same register ask for theirs, so no two records
/// at one register share a bit until all sixteen are used and the sequence
/// restarts.
#[derive(Debug, Default)]
pub struct RegisterBits {
    registers: BTreeMap<Option<i64>, Slots>,
}

#[derive(Debug, Default)]
struct Slots {
    taken: u16,
    next: usize,
}

impl RegisterBits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `mask` as used at `register`.
    pub fn reserve(&mut self, register: Option<i64>, mask: u16) {
        self.registers.entry(register).or_default().taken |= mask;
    }

    /// Next free bit at `register` in sequence order.
    pub fn allocate(&mut self, register: Option<i64>) -> u16 {
        let slots = self.registers.entry(register).or_default();
        if slots.taken == u16::MAX {
            slots.taken = 0;
        }
        let position = (slots.next..slots.next + MASK_GROUP_SIZE)
            .find(|position| slots.taken & mask_for(*position) == 0)
            .unwrap_or(slots.next);
        let mask = mask_for(position);
        slots.taken |= mask;
        slots.next = position + 1;
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_resets_every_sixteen() {
        assert_eq!(mask_for(0), 0x1);
        assert_eq!(mask_for(1), 0x2);
        assert_eq!(mask_for(15), 0x8000);
        assert_eq!(mask_for(16), 0x1);
    }

    #[test]
    fn allocation_skips_reserved_bits() {
        let mut bits = RegisterBits::new();
        bits.reserve(Some(41), 0x1);
        assert_eq!(bits.allocate(Some(41)), 0x2);
        assert_eq!(bits.allocate(Some(41)), 0x4);
        assert_eq!(bits.allocate(Some(42)), 0x1);
    }

    #[test]
    fn full_register_restarts_the_sequence() {
        let mut bits = RegisterBits::new();
        let masks: Vec<u16> = (0..17).map(|_| bits.allocate(Some(7))).collect();
        assert_eq!(masks[15], 0x8000);
        assert_eq!(masks[16], 0x1);
    }
}
