use crate::PathState;

/// Maximum number of path segments pending per pixel-sample.
pub const WORK_QUEUE_CAPACITY: usize = 16;

/// Fixed-capacity LIFO stack of pending path segments.
///
/// When full, specular segments take precedence over diffuse ones.
#[derive(Clone, Copy)]
pub struct WorkQueue {
    items: [PathState; WORK_QUEUE_CAPACITY],
    len: usize,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self {
            items: [PathState::default(); WORK_QUEUE_CAPACITY],
            len: 0,
        }
    }
}

impl WorkQueue {
    pub fn push(&mut self, state: PathState) -> PushOutcome {
        if self.len < WORK_QUEUE_CAPACITY {
            self.items[self.len] = state;
            self.len += 1;

            return PushOutcome::Pushed;
        }

        if !state.is_specular() {
            return PushOutcome::Dropped;
        }

        let victim = self
            .weakest(|item| !item.is_specular())
            .or_else(|| self.weakest(|_| true));

        match victim {
            Some(idx) => {
                self.items[idx] = state;
                PushOutcome::Evicted
            }
            None => PushOutcome::Dropped,
        }
    }

    pub fn pop(&mut self) -> Option<PathState> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;

        Some(self.items[self.len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[PathState] {
        &self.items[..self.len]
    }

    fn weakest(&self, filter: impl Fn(&PathState) -> bool) -> Option<usize> {
        let mut weakest = None;
        let mut weakest_strength = f32::MAX;
        let mut idx = 0;

        while idx < self.len {
            let item = &self.items[idx];

            if filter(item) && item.strength() < weakest_strength {
                weakest = Some(idx);
                weakest_strength = item.strength();
            }

            idx += 1;
        }

        weakest
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum PushOutcome {
    Pushed,

    /// Queue was full and the weakest eligible entry got replaced.
    Evicted,

    /// Queue was full and the pushed state was discarded.
    Dropped,
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::PathFlags;

    fn state(strength: f32, specular: bool) -> PathState {
        PathState {
            throughput: Vec3::splat(strength),
            flags: PathFlags::default().with(PathFlags::SPECULAR, specular),
            ..Default::default()
        }
    }

    #[test]
    fn lifo() {
        let mut queue = WorkQueue::default();

        queue.push(state(0.1, false));
        queue.push(state(0.2, false));

        assert_eq!(Some(0.2), queue.pop().map(|s| s.strength()));
        assert_eq!(Some(0.1), queue.pop().map(|s| s.strength()));
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn drops_diffuse_when_full() {
        let mut queue = WorkQueue::default();

        for _ in 0..WORK_QUEUE_CAPACITY {
            assert_eq!(PushOutcome::Pushed, queue.push(state(0.5, false)));
        }

        assert_eq!(PushOutcome::Dropped, queue.push(state(0.9, false)));
        assert_eq!(WORK_QUEUE_CAPACITY, queue.len());
    }

    #[test]
    fn specular_evicts_weakest_diffuse() {
        let mut queue = WorkQueue::default();

        for idx in 0..WORK_QUEUE_CAPACITY {
            let specular = idx % 2 == 0;

            // Specular entries are the weakest ones, so they'd be evicted
            // first if the policy ignored flags
            let strength = if specular { 0.01 } else { 0.5 + idx as f32 };

            queue.push(state(strength, specular));
        }

        assert_eq!(PushOutcome::Evicted, queue.push(state(0.3, true)));
        assert_eq!(WORK_QUEUE_CAPACITY, queue.len());

        let specular_count =
            queue.as_slice().iter().filter(|s| s.is_specular()).count();

        assert_eq!(WORK_QUEUE_CAPACITY / 2 + 1, specular_count);

        // The weakest diffuse entry (strength 1.5) is gone
        assert!(queue.as_slice().iter().all(|s| s.strength() != 1.5));
    }

    #[test]
    fn specular_evicts_weakest_specular_when_no_diffuse_left() {
        let mut queue = WorkQueue::default();

        for idx in 0..WORK_QUEUE_CAPACITY {
            queue.push(state(1.0 + idx as f32, true));
        }

        assert_eq!(PushOutcome::Evicted, queue.push(state(0.5, true)));
        assert!(queue.as_slice().iter().all(|s| s.strength() != 1.0));
        assert!(queue.as_slice().iter().any(|s| s.strength() == 0.5));
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut queue = WorkQueue::default();

        for _ in 0..10_000 {
            if rng.gen_bool(0.3) {
                queue.pop();
            } else {
                let outcome = queue.push(state(rng.gen(), rng.gen_bool(0.5)));

                if queue.len() < WORK_QUEUE_CAPACITY {
                    assert_eq!(PushOutcome::Pushed, outcome);
                }
            }

            assert!(queue.len() <= WORK_QUEUE_CAPACITY);
        }
    }
}
