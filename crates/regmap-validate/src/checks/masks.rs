//! Single-bit mask checks.
//!
//! Siblings are the children of an aggregate record (consecutive 1bit
//! records at the following registers) or, outside a template, the 1bit
//! records sharing one register. Template children read `0x1, 0x2, 0x4...`
//! in order, restarting every 16 positions. Other 1bit records take the bits
//! their register has left free once the children are placed.

use regmap_model::{AGGREGATE_TAG, ParameterRecord, format_mask};
use regmap_transform::{RegisterBits, mask_for};

use crate::issue::Issue;

/// Children of the last aggregate seen: its base register and the next index.
#[derive(Debug, Clone, Copy)]
struct Template {
    base: i64,
    next: usize,
}

impl Template {
    fn claims(&self, register: Option<i64>) -> bool {
        let offset = i64::try_from(self.next).unwrap_or(i64::MAX);
        register == self.base.checked_add(offset).and_then(|r| r.checked_add(1))
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Wide,
    Child(u16),
    Standalone,
}

pub fn check(records: &[ParameterRecord]) -> Vec<Issue> {
    let mut bits = RegisterBits::new();
    let mut template: Option<Template> = None;
    let mut slots = Vec::with_capacity(records.len());

    for record in records {
        if record.tags.contains(AGGREGATE_TAG) || !record.length.is_single_bit() {
            template = if record.tags.contains(AGGREGATE_TAG) {
                record.register.map(|base| Template { base, next: 0 })
            } else {
                None
            };
            slots.push(Slot::Wide);
            continue;
        }
        match template.as_mut() {
            Some(current) if current.claims(record.register) => {
                let mask = mask_for(current.next);
                current.next += 1;
                bits.reserve(record.register, mask);
                slots.push(Slot::Child(mask));
            }
            _ => {
                template = None;
                slots.push(Slot::Standalone);
            }
        }
    }

    let mut issues = Vec::new();
    for (record, slot) in records.iter().zip(slots) {
        let expected = match slot {
            Slot::Wide => {
                if let Some(mask) = record.mask
                    && !record.length.is_single_bit()
                {
                    issues.push(Issue::MaskOnWideRecord {
                        id: record.id,
                        name: record.name.clone(),
                        length: record.length.to_string(),
                        mask: format_mask(Some(mask)),
                    });
                }
                continue;
            }
            Slot::Child(mask) => mask,
            Slot::Standalone => bits.allocate(record.register),
        };
        match record.mask {
            None => issues.push(Issue::MissingMask {
                id: record.id,
                name: record.name.clone(),
            }),
            Some(found) if found != expected => issues.push(Issue::MaskOutOfOrder {
                id: record.id,
                name: record.name.clone(),
                expected: format_mask(Some(expected)),
                found: format_mask(Some(found)),
            }),
            Some(_) => {}
        }
    }
    issues
}
