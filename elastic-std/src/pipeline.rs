//! Chain of handshake registers.

use elastic::*;
use itertools::izip;
use log::debug;

use crate::config::{ConfigError, RegisterConfig};
use crate::register::{HandshakeRegister, Slot};

/// Chain of `depth` handshake registers, stage 0 facing the producer.
///
/// Every stage is evaluated against the state entering the tick: forward signals come from each stage's
/// registers, ready propagates from the consumer back to the producer, and then all stages commit together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stage: HandshakeRegister,
    depth: usize,
}

impl Pipeline {
    /// Creates a new pipeline.
    pub fn new(config: RegisterConfig, depth: usize) -> Result<Self, ConfigError> {
        if depth == 0 {
            return Err(ConfigError::EmptyPipeline);
        }
        let stage = HandshakeRegister::new(config)?;
        debug!("pipeline: {} stage(s)", depth);
        Ok(Self { stage, depth })
    }

    /// Number of stages.
    pub fn depth(&self) -> usize { self.depth }

    /// Stage component.
    pub fn stage(&self) -> &HandshakeRegister { &self.stage }

    /// Number of items held.
    pub fn occupancy(s: &[Slot]) -> usize { s.iter().filter(|slot| slot.is_occupied()).count() }
}

impl Fsm for Pipeline {
    type I = VrChannel<Bits>;
    type O = VrChannel<Bits>;
    type State = Vec<Slot>;

    fn module_name(&self) -> String { format!("handshake_pipeline_{}", self.depth) }

    fn init(&self) -> Vec<Slot> { vec![Slot::Empty; self.depth] }

    fn comb(&self, i_fwd: &Valid<Bits>, o_bwd: &Ready, s: &Vec<Slot>) -> (Valid<Bits>, Ready, Vec<Slot>) {
        assert_eq!(s.len(), self.depth, "internal error: pipeline state has the wrong number of stages");

        let stage_fwds = s.iter().map(|slot| self.stage.egress_fwd(slot)).collect::<Vec<_>>();

        // `readies[k]` is the ready seen by stage `k` at its egress.
        let mut readies = vec![*o_bwd; self.depth];
        for k in (0..self.depth - 1).rev() {
            readies[k] = self.stage.ingress_bwd(&s[k + 1], &readies[k + 1]);
        }
        let i_bwd = self.stage.ingress_bwd(&s[0], &readies[0]);

        let ingress = std::iter::once(i_fwd).chain(stage_fwds.iter());
        let s_next = izip!(s, ingress, &readies).map(|(slot, fwd, ready)| self.stage.next(slot, fwd, ready)).collect();

        let o_fwd = stage_fwds.last().cloned().unwrap_or_default();
        (o_fwd, i_bwd, s_next)
    }
}
