//! Finite state machine (Mealy machine).

use std::fmt::Debug;

use crate::channel::Interface;

/// Finite state machine (Mealy machine) between an ingress and an egress interface.
///
/// `comb` is the whole behavior of a component for one tick: from the ingress forward signals, the egress
/// backward signals and the state entering the tick, it returns the egress forward signals, the ingress
/// backward signals and the state leaving the tick. Outputs must not depend on the returned state.
pub trait Fsm {
    /// Ingress interface.
    type I: Interface;

    /// Egress interface.
    type O: Interface;

    /// Registers of the machine.
    type State: Debug + Clone;

    /// Module name.
    fn module_name(&self) -> String;

    /// State after reset.
    fn init(&self) -> Self::State;

    /// Combinational logic and next-state function.
    #[allow(clippy::type_complexity)]
    fn comb(
        &self, i_fwd: &<Self::I as Interface>::Fwd, o_bwd: &<Self::O as Interface>::Bwd, s: &Self::State,
    ) -> (<Self::O as Interface>::Fwd, <Self::I as Interface>::Bwd, Self::State);
}
