use std::io::Read;

use log::{debug, trace};

use crate::error::Result;
use crate::source::for_each_chunk;

/// Occurrence count of every byte value in one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreqTable {
    counts: [u64; 256],
}

impl Default for FreqTable {
    fn default() -> Self {
        FreqTable { counts: [0; 256] }
    }
}

impl FreqTable {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = FreqTable::default();
        table.add(data);
        table
    }

    fn add(&mut self, data: &[u8]) {
        for &b in data {
            self.counts[b as usize] += 1;
        }
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Bytes that occur at least once, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }

    pub fn unique_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total_f = total as f64;

        let entropy: f64 = self
            .iter()
            .map(|(_, count)| {
                let p = count as f64 / total_f;
                -p * p.log2()
            })
            .sum();

        trace!(
            "Calculated entropy: {:.4} bits/symbol (Total samples: {})",
            entropy, total
        );
        entropy
    }
}

/// Counts the first `length` bytes of `source` in a single sequential pass.
pub fn build_frequency_table<R: Read>(source: R, length: u64) -> Result<FreqTable> {
    let mut table = FreqTable::default();
    for_each_chunk(source, length, |chunk, _| {
        table.add(chunk);
        Ok(())
    })?;

    debug!(
        "Counted {} bytes, {} unique symbols",
        length,
        table.unique_symbols()
    );
    Ok(table)
}
