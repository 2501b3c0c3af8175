//! Ordered queue of work and rest phases

use super::Phase;

/// Phases derived from one interval configuration, consumed front to back.
///
/// For `repetitions` rounds the queue yields `WORK(work), REST(rest)` in that
/// order, so its initial length is always `2 * repetitions`. Zero-length
/// phases keep their slot. Phases are computed from a cursor rather than
/// stored, so memory use does not depend on the repetition count.
#[derive(Debug, Clone, Default)]
pub struct PhaseQueue {
    work_ms: u64,
    rest_ms: u64,
    total: u64,
    next: u64,
}

impl PhaseQueue {
    /// Generate the queue for a validated configuration
    pub fn generate(work_ms: u64, rest_ms: u64, repetitions: u32) -> Self {
        Self {
            work_ms,
            rest_ms,
            total: 2 * u64::from(repetitions),
            next: 0,
        }
    }

    /// Take the next phase off the front of the queue
    pub fn dequeue(&mut self) -> Option<Phase> {
        let phase = self.phase_at(self.next)?;
        self.next += 1;
        Some(phase)
    }

    pub fn len(&self) -> u64 {
        self.total - self.next
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining phases in order, without consuming them
    pub fn iter(&self) -> impl Iterator<Item = Phase> + '_ {
        (self.next..self.total).filter_map(move |index| self.phase_at(index))
    }

    fn phase_at(&self, index: u64) -> Option<Phase> {
        if index >= self.total {
            return None;
        }
        Some(if index % 2 == 0 {
            Phase::work(self.work_ms)
        } else {
            Phase::rest(self.rest_ms)
        })
    }
}
