use elastic::*;
use elastic_std::*;
use proptest::prelude::*;

const WIDTH: usize = 8;

/// One tick of stimulus.
#[derive(Debug, Clone, Copy)]
struct Stimulus {
    offer: bool,
    out_ready: bool,
    reset: bool,
    /// Reset pulse before the tick.
    pulse: bool,
}

fn arb_stimuli(max_len: usize) -> impl Strategy<Value = Vec<Stimulus>> {
    proptest::collection::vec(
        (any::<bool>(), any::<bool>(), 0u8..16).prop_map(|(offer, out_ready, reset)| Stimulus {
            offer,
            out_ready,
            reset: reset == 0,
            pulse: reset == 1,
        }),
        0..max_len,
    )
}

/// Producer keeping an offer stable until it is transferred.
#[derive(Debug, Default)]
struct Producer {
    pending: Option<u64>,
    next: u64,
}

impl Producer {
    fn drive(&mut self, offer: bool) -> Valid<Bits> {
        if self.pending.is_none() && offer {
            self.pending = Some(self.next);
            self.next += 1;
        }
        self.pending.map(|value| Bits::from_u64(WIDTH, value)).into()
    }

    fn observe<O: Interface>(&mut self, cycle: &Cycle<VrChannel<Bits>, O>) {
        if cycle.in_fwd.is_valid() && cycle.in_bwd.ready && !cycle.reset {
            self.pending = None;
        }
    }
}

fn drive_reset<M: Fsm>(sim: &mut Simulator<M>, stimulus: &Stimulus) {
    if stimulus.pulse {
        sim.set_reset(true);
        sim.set_reset(false);
    }
    sim.set_reset(stimulus.reset);
}

fn run<M>(machine: M, capacity: usize, stimuli: &[Stimulus]) -> Result<(Vec<u64>, Vec<u64>), ProtocolError>
where M: Fsm<I = VrChannel<Bits>, O = VrChannel<Bits>> {
    let mut sim = Simulator::new(machine);
    let mut checker = ProtocolChecker::new(capacity);
    let mut producer = Producer::default();
    let (mut accepted, mut delivered) = (vec![], vec![]);

    for stimulus in stimuli {
        drive_reset(&mut sim, stimulus);
        let cycle = sim.tick(producer.drive(stimulus.offer), Ready::new(stimulus.out_ready));
        checker.observe(&cycle)?;
        producer.observe(&cycle);
        accepted.extend(cycle.accepted().and_then(Bits::to_u64));
        delivered.extend(cycle.delivered().and_then(Bits::to_u64));
    }
    Ok((accepted, delivered))
}

fn register() -> HandshakeRegister { HandshakeRegister::new(RegisterConfig::default().with_data_width(WIDTH)).unwrap() }

#[test]
fn reset_pulse_between_ticks_is_not_a_violation() {
    let stall = Stimulus { offer: true, out_ready: false, reset: false, pulse: false };
    let pulse = Stimulus { offer: true, out_ready: true, reset: false, pulse: true };
    let drain = Stimulus { pulse: false, ..pulse };
    let (accepted, delivered) = run(register(), 1, &[stall, stall, pulse, drain]).unwrap();
    // Item 0 is lost to the pulse. Item 1 is still offered, so it is accepted right after the pulse.
    assert_eq!(accepted, [0, 1, 2]);
    assert_eq!(delivered, [1]);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn register_never_loses_or_duplicates(stimuli in arb_stimuli(200)) {
        let stimuli = stimuli.into_iter().map(|s| Stimulus { reset: false, pulse: false, ..s }).collect::<Vec<_>>();
        let (accepted, delivered) = run(register(), 1, &stimuli).unwrap();
        prop_assert!(accepted.len() - delivered.len() <= 1);
        prop_assert_eq!(&accepted[..delivered.len()], &delivered[..]);
    }

    #[test]
    fn register_obeys_the_protocol_across_resets(stimuli in arb_stimuli(200)) {
        prop_assert!(run(register(), 1, &stimuli).is_ok());
    }

    #[test]
    fn pipeline_obeys_the_protocol(depth in 1usize..5, stimuli in arb_stimuli(200)) {
        let pipeline = Pipeline::new(RegisterConfig::default().with_data_width(WIDTH), depth).unwrap();
        prop_assert!(run(pipeline, depth, &stimuli).is_ok());
    }

    #[test]
    fn single_stage_pipeline_is_a_register(stimuli in arb_stimuli(100)) {
        let mut reg = Simulator::new(register());
        let mut pipe = Simulator::new(Pipeline::new(RegisterConfig::default().with_data_width(WIDTH), 1).unwrap());

        for (i, stimulus) in stimuli.iter().enumerate() {
            let in_fwd = Valid::new(stimulus.offer, Bits::from_u64(WIDTH, i as u64));
            drive_reset(&mut reg, stimulus);
            drive_reset(&mut pipe, stimulus);
            let a = reg.tick(in_fwd.clone(), Ready::new(stimulus.out_ready));
            let b = pipe.tick(in_fwd, Ready::new(stimulus.out_ready));
            prop_assert_eq!(a.out_fwd, b.out_fwd);
            prop_assert_eq!(a.in_bwd, b.in_bwd);
            prop_assert_eq!(reg.state(), &pipe.state()[0]);
        }
    }

    #[test]
    fn out_valid_iff_occupied(stimuli in arb_stimuli(100)) {
        let mut sim = Simulator::new(register());
        for (i, stimulus) in stimuli.iter().enumerate() {
            drive_reset(&mut sim, stimulus);
            let occupied = sim.state().is_occupied();
            let in_fwd = Valid::new(stimulus.offer, Bits::from_u64(WIDTH, i as u64));
            let cycle = sim.tick(in_fwd, Ready::new(stimulus.out_ready));
            prop_assert_eq!(cycle.out_fwd.is_valid(), occupied);
            prop_assert_eq!(cycle.in_bwd.ready, !occupied || stimulus.out_ready);
        }
    }
}

/// Always ready, overwriting whatever it holds.
#[derive(Debug)]
struct Overwriting(HandshakeRegister);

impl Fsm for Overwriting {
    type I = VrChannel<Bits>;
    type O = VrChannel<Bits>;
    type State = Slot;

    fn module_name(&self) -> String { "overwriting".to_string() }

    fn init(&self) -> Slot { Slot::Empty }

    fn comb(&self, i_fwd: &Valid<Bits>, o_bwd: &Ready, s: &Slot) -> (Valid<Bits>, Ready, Slot) {
        let s_next = match i_fwd.inner() {
            Some(data) => Slot::Full(data.clone()),
            None if o_bwd.ready => Slot::Empty,
            None => s.clone(),
        };
        (self.0.egress_fwd(s), Ready::new(true), s_next)
    }
}

#[test]
fn checker_catches_a_lossy_register() {
    let stall = Stimulus { offer: true, out_ready: false, reset: false, pulse: false };
    let drain = Stimulus { offer: false, out_ready: true, reset: false, pulse: false };
    let error = run(Overwriting(register()), 1, &[stall, stall, drain, drain]).unwrap_err();
    assert!(matches!(error, ProtocolError::Overflow { cycle: 1, .. }), "{}", error);
}
