//! Entity selection bitmaps (which CPUs / interrupts to print).
//!
//! Index 0 is the aggregate entity ("all" CPUs, interrupt "sum"); index
//! `n + 1` is entity `n`.

use bitvec::prelude::*;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    bits: BitVec,
    /// Answer for indices past the end of `bits`.
    rest: bool,
}

impl Selection {
    /// Only the aggregate entity.
    pub fn aggregate_only() -> Self {
        Self {
            bits: bitvec![1],
            rest: false,
        }
    }

    /// The aggregate and every individual entity.
    pub fn all() -> Self {
        Self {
            bits: BitVec::new(),
            rest: true,
        }
    }

    /// The listed entities, without the aggregate.
    pub fn entities(ids: &[usize]) -> Self {
        let mut sel = Self {
            bits: BitVec::new(),
            rest: false,
        };
        for &id in ids {
            sel.insert(id + 1);
        }
        sel
    }

    fn insert(&mut self, index: usize) {
        if index >= self.bits.len() {
            self.bits.resize(index + 1, self.rest);
        }
        self.bits.set(index, true);
    }

    /// Also select the aggregate entity.
    pub fn with_aggregate(mut self) -> Self {
        self.insert(0);
        self
    }

    pub fn contains(&self, index: usize) -> bool {
        if index < self.bits.len() {
            self.bits[index]
        } else {
            self.rest
        }
    }

    /// Parse `ALL`, `SUM`/`AGG` (aggregate only) or a comma list of entity
    /// ids, where `-1` stands for the aggregate.
    pub fn parse(spec: &str) -> Result<Self, Error> {
        let trimmed = spec.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "all" => return Ok(Self::all()),
            "sum" | "agg" | "aggregate" => return Ok(Self::aggregate_only()),
            _ => {}
        }

        let mut sel = Self::entities(&[]);
        for part in trimmed.split(',').map(str::trim) {
            if part == "-1" {
                sel.insert(0);
                continue;
            }
            let id: usize = part
                .parse()
                .map_err(|_| Error::InvalidSelection(spec.to_string()))?;
            sel.insert(id + 1);
        }
        Ok(sel)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::aggregate_only()
    }
}
