//! Byte frequency analysis.

/// Occurrence count for each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count every byte of `data` in a single pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.count(data);
        table
    }

    /// Add the bytes of `data` to the running counts.
    pub fn count(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present byte values with their counts, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_byte() {
        let table = FrequencyTable::from_bytes(b"aaaabbbccd");
        assert_eq!(table.get(b'a'), 4);
        assert_eq!(table.get(b'b'), 3);
        assert_eq!(table.get(b'c'), 2);
        assert_eq!(table.get(b'd'), 1);
        assert_eq!(table.get(b'e'), 0);
        assert_eq!(table.distinct(), 4);
        assert_eq!(table.total(), 10);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.distinct(), 0);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_iter_is_sorted_and_skips_absent() {
        let table = FrequencyTable::from_bytes(&[200, 3, 3, 0, 200, 200]);
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![(0, 1), (3, 2), (200, 3)]);
    }

    #[test]
    fn test_incremental_count() {
        let mut table = FrequencyTable::new();
        table.count(b"ab");
        table.count(b"b");
        assert_eq!(table, FrequencyTable::from_bytes(b"abb"));
    }
}
