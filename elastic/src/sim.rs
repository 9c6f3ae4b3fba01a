//! Cycle-level simulation.
//!
//! A [`Simulator`] owns one machine and its registers. Each call to [`Simulator::tick`] evaluates the machine's
//! combinational logic against the state entering the tick and then commits the next state, so nothing
//! written during a tick is observable until the following one.

use std::fmt::Debug;

use log::{debug, trace};

use crate::channel::*;
use crate::fsm::Fsm;

/// Signals observed on both interfaces of a machine during one tick.
#[derive(Debug, Clone)]
pub struct Cycle<I: Interface, O: Interface> {
    /// Tick index, starting from 0.
    pub index: u64,

    /// Whether reset was asserted during the tick.
    pub reset: bool,

    /// Whether reset was pulsed since the previous tick. The machine entered the tick in its reset state.
    pub reset_pulsed: bool,

    /// Ingress forward signals.
    pub in_fwd: I::Fwd,

    /// Ingress backward signals.
    pub in_bwd: I::Bwd,

    /// Egress forward signals.
    pub out_fwd: O::Fwd,

    /// Egress backward signals.
    pub out_bwd: O::Bwd,
}

impl<V: 'static + Debug + Clone, W: 'static + Debug + Clone> Cycle<VrChannel<V>, VrChannel<W>> {
    /// Ingress edge.
    pub fn in_edge(&self) -> Edge<V> { Edge::new(self.in_fwd.clone(), self.in_bwd) }

    /// Egress edge.
    pub fn out_edge(&self) -> Edge<W> { Edge::new(self.out_fwd.clone(), self.out_bwd) }

    /// Value accepted from the ingress edge. Reset discards anything offered while it is asserted.
    pub fn accepted(&self) -> Option<&V> {
        if self.reset {
            return None;
        }
        self.in_fwd.inner().filter(|_| self.in_bwd.ready)
    }

    /// Value delivered on the egress edge.
    pub fn delivered(&self) -> Option<&W> {
        if self.reset {
            return None;
        }
        self.out_fwd.inner().filter(|_| self.out_bwd.ready)
    }
}

/// Simulator of a machine with an asynchronous reset.
#[derive(Debug)]
pub struct Simulator<M: Fsm> {
    machine: M,
    state: M::State,
    reset: bool,
    reset_pulsed: bool,
    cycle: u64,
}

impl<M: Fsm> Simulator<M> {
    /// Creates a new simulator. The machine starts in its reset state.
    pub fn new(machine: M) -> Self {
        let state = machine.init();
        debug!("{}: created in {:?}", machine.module_name(), state);
        Self { machine, state, reset: false, reset_pulsed: false, cycle: 0 }
    }

    /// Simulated machine.
    pub fn machine(&self) -> &M { &self.machine }

    /// State entering the next tick.
    pub fn state(&self) -> &M::State { &self.state }

    /// Number of ticks simulated so far.
    pub fn cycle(&self) -> u64 { self.cycle }

    /// Whether reset is asserted.
    pub fn is_reset(&self) -> bool { self.reset }

    /// Drives the asynchronous reset.
    ///
    /// Asserting reset forces the reset state immediately, without waiting for a tick. The state stays there
    /// on every tick until reset is released.
    pub fn set_reset(&mut self, asserted: bool) {
        if asserted {
            self.state = self.machine.init();
            self.reset_pulsed = true;
        }
        if asserted != self.reset {
            debug!(
                "{}: reset {} before cycle {}",
                self.machine.module_name(),
                if asserted { "asserted" } else { "released" },
                self.cycle
            );
        }
        self.reset = asserted;
    }

    /// Evaluates the combinational outputs for the given inputs without advancing.
    pub fn eval(
        &self, i_fwd: &<M::I as Interface>::Fwd, o_bwd: &<M::O as Interface>::Bwd,
    ) -> (<M::O as Interface>::Fwd, <M::I as Interface>::Bwd) {
        let (o_fwd, i_bwd, _) = self.machine.comb(i_fwd, o_bwd, &self.state);
        (o_fwd, i_bwd)
    }

    /// Advances one tick.
    ///
    /// The returned cycle holds the outputs computed from the state entering the tick.
    pub fn tick(&mut self, i_fwd: <M::I as Interface>::Fwd, o_bwd: <M::O as Interface>::Bwd) -> Cycle<M::I, M::O> {
        let (o_fwd, i_bwd, state_next) = self.machine.comb(&i_fwd, &o_bwd, &self.state);

        if !self.reset {
            self.state = state_next;
        }
        trace!(
            "{}: cycle {}: in ({:?}, {:?}), out ({:?}, {:?}), next {:?}",
            self.machine.module_name(),
            self.cycle,
            i_fwd,
            i_bwd,
            o_fwd,
            o_bwd,
            self.state
        );

        let cycle = Cycle {
            index: self.cycle,
            reset: self.reset,
            reset_pulsed: self.reset_pulsed,
            in_fwd: i_fwd,
            in_bwd: i_bwd,
            out_fwd: o_fwd,
            out_bwd: o_bwd,
        };
        self.reset_pulsed = false;
        self.cycle += 1;
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts transfers. Always ready; emits the running count on every tick.
    #[derive(Debug)]
    struct Counter;

    impl Fsm for Counter {
        type I = VrChannel<()>;
        type O = VrChannel<u32>;
        type State = u32;

        fn module_name(&self) -> String { "counter".to_string() }

        fn init(&self) -> u32 { 0 }

        fn comb(&self, i_fwd: &Valid<()>, _o_bwd: &Ready, s: &u32) -> (Valid<u32>, Ready, u32) {
            let s_next = if i_fwd.is_valid() { s + 1 } else { *s };
            (Valid::valid(*s), Ready::new(true), s_next)
        }
    }

    #[test]
    fn outputs_reflect_state_entering_tick() {
        let mut sim = Simulator::new(Counter);
        let cycle = sim.tick(Valid::valid(()), Ready::new(true));
        assert_eq!(cycle.out_fwd.inner(), Some(&0));
        assert_eq!(*sim.state(), 1);

        let cycle = sim.tick(Valid::invalid(), Ready::new(true));
        assert_eq!(cycle.index, 1);
        assert_eq!(cycle.out_fwd.inner(), Some(&1));
        assert_eq!(*sim.state(), 1);
        assert_eq!(sim.cycle(), 2);
    }

    #[test]
    fn eval_does_not_commit() {
        let sim = Simulator::new(Counter);
        let (o_fwd, i_bwd) = sim.eval(&Valid::valid(()), &Ready::new(true));
        assert_eq!(o_fwd.into_inner(), Some(0));
        assert!(i_bwd.ready);
        assert_eq!(*sim.state(), 0);
    }

    #[test]
    fn reset_is_asynchronous_and_dominant() {
        let mut sim = Simulator::new(Counter);
        for _ in 0..3 {
            let _ = sim.tick(Valid::valid(()), Ready::new(true));
        }
        assert_eq!(*sim.state(), 3);

        sim.set_reset(true);
        assert_eq!(*sim.state(), 0);

        let cycle = sim.tick(Valid::valid(()), Ready::new(true));
        assert!(cycle.reset);
        assert_eq!(cycle.accepted(), None);
        assert_eq!(*sim.state(), 0);

        sim.set_reset(false);
        let cycle = sim.tick(Valid::valid(()), Ready::new(true));
        assert!(!cycle.reset);
        assert_eq!(cycle.accepted(), Some(&()));
        assert_eq!(*sim.state(), 1);
    }

    #[test]
    fn reset_pulse_between_ticks_is_reported_once() {
        let mut sim = Simulator::new(Counter);
        let _ = sim.tick(Valid::valid(()), Ready::new(true));
        let _ = sim.tick(Valid::valid(()), Ready::new(true));

        sim.set_reset(true);
        sim.set_reset(false);
        assert_eq!(*sim.state(), 0);

        // The pulse is over: the tick commits, but records that it started from reset.
        let cycle = sim.tick(Valid::valid(()), Ready::new(true));
        assert!(!cycle.reset);
        assert!(cycle.reset_pulsed);
        assert_eq!(cycle.out_fwd.inner(), Some(&0));
        assert_eq!(cycle.accepted(), Some(&()));
        assert_eq!(*sim.state(), 1);

        let cycle = sim.tick(Valid::invalid(), Ready::new(true));
        assert!(!cycle.reset_pulsed);
    }
}
