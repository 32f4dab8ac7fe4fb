//! Random well-formed keys and values, fed through [`SlotTable::insert_key`].

use log::info;
use rand::Rng;

use crate::key::Key;
use crate::table::SlotTable;

/// Digit pairs are drawn from this range, so generated keys never start with `0`.
const DIGIT_PAIR_RANGE: std::ops::RangeInclusive<u8> = 10..=99;
/// Values are decimal renderings of numbers in this range.
const VALUE_RANGE: std::ops::RangeInclusive<u32> = 0..=999;

/// Outcome counts of a [`generate`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Keys that made a slot live or joined one.
    pub inserted: usize,
    /// Keys already present; no-ops.
    pub duplicates: usize,
    /// Keys whose probe path had no room.
    pub rejected: usize,
}

impl GenerateReport {
    pub fn attempted(&self) -> usize {
        self.inserted + self.duplicates + self.rejected
    }
}

/// A uniformly random `DDLLDD` key with both digit pairs in `[10, 99]`.
pub fn random_key<R: Rng + ?Sized>(rng: &mut R) -> Key {
    let head = rng.gen_range(DIGIT_PAIR_RANGE);
    let tail = rng.gen_range(DIGIT_PAIR_RANGE);
    let letters = [rng.gen_range(b'A'..=b'Z'), rng.gen_range(b'A'..=b'Z')];
    Key::from_parts(head, letters, tail)
}

/// A uniformly random value in `[0, 999]`, rendered in decimal.
pub fn random_value<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(VALUE_RANGE).to_string()
}

/// Inserts `count` random key/value pairs into `table`.
///
/// Duplicates follow the table's no-op policy and a full probe path is
/// counted rather than aborting the run.
pub fn generate<R: Rng + ?Sized>(
    table: &mut SlotTable,
    count: usize,
    rng: &mut R,
) -> GenerateReport {
    let mut report = GenerateReport::default();
    for _ in 0..count {
        let key = random_key(rng);
        let value = random_value(rng);
        match table.insert_key(key, value) {
            Ok(insertion) if insertion.is_new() => report.inserted += 1,
            Ok(_) => report.duplicates += 1,
            Err(_) => report.rejected += 1,
        }
    }
    info!(
        "generated {} keys: {} inserted, {} duplicates, {} rejected",
        report.attempted(),
        report.inserted,
        report.duplicates,
        report.rejected
    );
    report
}
