//! Model checking of the handshake register.
//!
//! [`HandshakeModel`] explores every interleaving of producer offers, consumer stalls and resets for a bounded
//! sequence of tagged items. Each step runs the register's own combinational logic, so the model checks the
//! implementation rather than a copy of its equations.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use elastic::*;
use elastic_std::{ConfigError, HandshakeRegister, RegisterConfig, Slot};
use stateright::{Model, Property};
use thiserror::Error;

/// Payload width used by the model. Wide enough to tag every item.
pub const DATA_WIDTH: usize = 4;

/// Number of items the producer sends by default.
pub const ITEMS: u8 = 4;

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{items} items cannot be tagged in {width} bits")]
    TooManyItems { items: u8, width: usize },
}

/// Model state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    /// Register state.
    pub slot: Slot,

    /// Tag of the next item the producer offers.
    pub next_send: u8,

    /// Tag of the next item the consumer expects.
    pub next_expect: u8,

    /// Whether the producer has an offer pending. A pending offer must be repeated until it is accepted.
    pub offering: bool,

    /// Whether a full register has accepted and delivered in the same tick.
    pub overwrote: bool,

    /// Whether an item was delivered out of order, twice, or without being sent.
    pub misordered: bool,

    /// Whether `out_valid` disagreed with the occupancy.
    pub spurious_valid: bool,

    /// Whether `in_ready` disagreed with `!occupied | out_fire`.
    pub wrong_ready: bool,
}

/// Model action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// One tick with the given producer and consumer signals.
    Tick {
        /// Producer's `in_valid`.
        in_valid: bool,

        /// Consumer's `out_ready`.
        out_ready: bool,
    },

    /// Asynchronous reset pulse. Whatever the register held is lost.
    Reset,
}

/// Handshake register driven by an arbitrary well-behaved producer and an arbitrary consumer.
#[derive(Debug, Clone)]
pub struct HandshakeModel {
    register: HandshakeRegister,
    items: u8,
}

impl HandshakeModel {
    /// Creates a new model sending `items` items.
    pub fn new(items: u8) -> Result<Self, ModelError> {
        if u64::from(items) > 1 << DATA_WIDTH {
            return Err(ModelError::TooManyItems { items, width: DATA_WIDTH });
        }
        let register = HandshakeRegister::new(RegisterConfig::default().with_data_width(DATA_WIDTH))?;
        Ok(Self { register, items })
    }

    /// Number of items the producer sends.
    pub fn items(&self) -> u8 { self.items }

    fn tick(&self, s: &State, in_valid: bool, out_ready: bool) -> State {
        let i_fwd = Valid::new(in_valid, Bits::from_u64(DATA_WIDTH, u64::from(s.next_send)));
        let o_bwd = Ready::new(out_ready);
        let (o_fwd, i_bwd, slot) = self.register.comb(&i_fwd, &o_bwd, &s.slot);

        let mut n = s.clone();
        n.slot = slot;
        n.spurious_valid |= o_fwd.is_valid() != s.slot.is_occupied();
        n.wrong_ready |= i_bwd.ready != (!s.slot.is_occupied() || out_ready);

        let delivered = Edge::new(o_fwd, o_bwd).transfer().and_then(Bits::to_u64);
        if let Some(tag) = delivered {
            n.misordered |= tag != u64::from(s.next_expect) || s.next_expect >= s.next_send;
            n.next_expect += 1;
        }

        let accepted = Edge::new(i_fwd, i_bwd).fire();
        if accepted {
            n.next_send += 1;
        }
        n.offering = in_valid && !accepted;
        n.overwrote |= accepted && delivered.is_some();
        n
    }
}

impl Model for HandshakeModel {
    type State = State;
    type Action = Action;

    fn init_states(&self) -> Vec<State> {
        vec![State {
            slot: self.register.init(),
            next_send: 0,
            next_expect: 0,
            offering: false,
            overwrote: false,
            misordered: false,
            spurious_valid: false,
            wrong_ready: false,
        }]
    }

    fn actions(&self, s: &State, actions: &mut Vec<Action>) {
        let offers: &[bool] = if s.offering {
            &[true]
        } else if s.next_send < self.items {
            &[false, true]
        } else {
            &[false]
        };
        for &in_valid in offers {
            for out_ready in [false, true] {
                actions.push(Action::Tick { in_valid, out_ready });
            }
        }
        actions.push(Action::Reset);
    }

    fn next_state(&self, s: &State, action: Action) -> Option<State> {
        match action {
            Action::Tick { in_valid, out_ready } => Some(self.tick(s, in_valid, out_ready)),
            Action::Reset => {
                let mut n = s.clone();
                n.slot = self.register.init();
                n.next_expect = n.next_send;
                Some(n)
            }
        }
    }

    fn properties(&self) -> Vec<Property<Self>> {
        vec![
            Property::always("delivered in order, exactly once", |_, s: &State| !s.misordered),
            Property::always("out_valid iff occupied", |_, s: &State| !s.spurious_valid),
            Property::always("in_ready iff empty or draining", |_, s: &State| !s.wrong_ready),
            Property::always("at most one item in flight", |_, s: &State| {
                s.next_send.checked_sub(s.next_expect) == Some(u8::from(s.slot.is_occupied()))
            }),
            Property::always("producer stays within the sequence", |m, s: &State| s.next_send <= m.items),
            Property::sometimes("register fills", |_, s: &State| s.slot.is_occupied()),
            Property::sometimes("full register refills while draining", |_, s: &State| s.overwrote),
            Property::sometimes("every item delivered", |m, s: &State| s.next_expect == m.items),
        ]
    }
}
