//! Batch-wave cursor
//!
//! Insertions are grouped into waves. The first wave covers ¾ of the first
//! subarray; each later wave covers the remaining quarter of the subarray
//! after the active one. The active subarray is recovered from the flat
//! `wave_start` counter by [`active_subarray`].

use crate::partition::Partition;
use log::debug;

/// Active subarray for a wave starting at `wave_start`: ⌊log2(wave_start + 1)⌋
#[inline]
pub fn active_subarray(wave_start: usize) -> usize {
    wave_start.saturating_add(1).ilog2() as usize
}

/// Progress through the current insertion wave
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchCursor {
    pub(crate) wave_start: usize,
    pub(crate) wave_size: usize,
    pub(crate) wave_progress: usize,
    pub(crate) frozen: bool,
}

impl BatchCursor {
    /// Cursor for a table whose first subarray has `first_size` slots
    pub fn new(first_size: usize) -> Self {
        BatchCursor {
            wave_start: 0,
            wave_size: first_size - first_size.div_ceil(4),
            wave_progress: 0,
            frozen: false,
        }
    }

    pub fn wave_start(&self) -> usize {
        self.wave_start
    }

    pub fn wave_size(&self) -> usize {
        self.wave_size
    }

    pub fn wave_progress(&self) -> usize {
        self.wave_progress
    }

    /// True once the wave has run past the last subarray
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Subarray the current wave belongs to
    #[inline]
    pub fn active(&self) -> usize {
        active_subarray(self.wave_start)
    }

    /// Count one insertion attempt, moving to the next wave when this one is
    /// complete
    ///
    /// Returns true if the wave advanced. Once no subarray follows the active
    /// one the cursor freezes and ignores further attempts.
    pub fn record_attempt(&mut self, partition: &Partition) -> bool {
        if self.frozen {
            return false;
        }

        self.wave_progress += 1;
        if self.wave_progress < self.wave_size {
            return false;
        }

        let active = self.active();
        match partition.get(active + 1) {
            Some(next) => {
                self.wave_start += self.wave_size;
                self.wave_size = next.size().div_ceil(4);
                self.wave_progress = 0;
                debug!(
                    "wave advanced: start={} size={} active={}",
                    self.wave_start,
                    self.wave_size,
                    self.active()
                );
                true
            }
            None => {
                self.frozen = true;
                debug!(
                    "wave cursor frozen at start={} (active subarray {} has no successor)",
                    self.wave_start, active
                );
                false
            }
        }
    }
}
