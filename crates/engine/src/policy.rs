use crate::core::{GameState, SimpleRng};
use crate::place::{legal_placements, Placement};

/// Policy chooses a placement for the current state.
///
/// Returns `None` when no legal placement exists (or the session is not playable).
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn choose(&mut self, state: &GameState) -> Option<Placement>;
}

/// Uniform pick among the legal placements, reproducible from its seed
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: SimpleRng,
}

impl RandomPolicy {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, state: &GameState) -> Option<Placement> {
        let options = legal_placements(state);
        if options.is_empty() {
            return None;
        }
        let idx = self.rng.next_range(options.len() as u32) as usize;
        options.get(idx).copied()
    }
}
