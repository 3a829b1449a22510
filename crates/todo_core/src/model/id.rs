//! Process-wide todo identifier allocation.
//!
//! # Responsibility
//! - Hand out numeric ids that are unique for the whole process lifetime.
//! - Keep ids roughly time-ordered so persisted ids from earlier sessions
//!   stay below freshly issued ones.
//!
//! # Invariants
//! - `next_todo_id()` never returns the same value twice in one process,
//!   including calls from different threads within the same millisecond.
//! - Issued ids are strictly increasing.
//! - `reserve_ids_through(n)` guarantees every later id is `> n`.
//! - Once `u64::MAX` has been issued or reserved, allocation fails with
//!   `IdsExhausted` instead of repeating a value.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_ISSUED_ID: AtomicU64 = AtomicU64::new(0);

/// No identifier above the last issued or reserved one is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdsExhausted;

impl Display for IdsExhausted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("no todo ids left to assign")
    }
}

impl Error for IdsExhausted {}

/// Returns a fresh identifier: `max(now_epoch_ms, last_issued + 1)`.
///
/// # Errors
/// - `IdsExhausted` when `last_issued` is already `u64::MAX`.
pub fn next_todo_id() -> Result<u64, IdsExhausted> {
    let now = now_epoch_ms();
    let mut last = LAST_ISSUED_ID.load(Ordering::Relaxed);
    loop {
        let candidate = last.checked_add(1).ok_or(IdsExhausted)?.max(now);
        match LAST_ISSUED_ID.compare_exchange_weak(
            last,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return Ok(candidate),
            Err(observed) => last = observed,
        }
    }
}

/// Moves the allocator past `max_seen` so ids loaded from storage are
/// never handed out again.
pub fn reserve_ids_through(max_seen: u64) {
    LAST_ISSUED_ID.fetch_max(max_seen, Ordering::AcqRel);
}

fn now_epoch_ms() -> u64 {
    // Clock before 1970 degrades to the pure counter.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
