//! Epoch boundary prediction.
//!
//! An epoch spans a fixed number of blocks. The next boundary is predicted
//! from the current height assuming the target block time.

/// Blocks per epoch.
pub const EPOCH_LENGTH: u64 = 30_000;

/// Target block time in milliseconds (14.4 s).
pub const BLOCK_TIME_MS: u64 = 14_400;

/// Blocks left until the next epoch boundary, in `1..=EPOCH_LENGTH`.
///
/// A height sitting exactly on a boundary counts a full epoch ahead.
pub fn blocks_until_epoch(height: u64) -> u64 {
    EPOCH_LENGTH - (height % EPOCH_LENGTH)
}

/// Milliseconds until the next epoch boundary.
pub fn epoch_offset_ms(height: u64) -> u64 {
    blocks_until_epoch(height) * BLOCK_TIME_MS
}

/// Predicted timestamp (ms) of the next epoch boundary.
pub fn next_epoch(height: u64, now_ms: i64) -> i64 {
    // offset is at most EPOCH_LENGTH * BLOCK_TIME_MS, well inside i64
    now_ms.saturating_add(epoch_offset_ms(height) as i64)
}
