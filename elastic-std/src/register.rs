//! Handshake register.

use std::any::type_name;

use elastic::*;
use log::debug;
use static_assertions::assert_impl_all;

use crate::config::{ConfigError, RegisterConfig};

/// Registers of a handshake register.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// No item in flight.
    #[default]
    Empty,

    /// Holds an item not yet delivered downstream.
    Full(Bits),
}

impl Slot {
    /// Returns `true` if the slot holds an item.
    pub fn is_occupied(&self) -> bool { matches!(self, Self::Full(_)) }

    /// Held item, if any.
    pub fn payload(&self) -> Option<&Bits> {
        match self {
            Self::Empty => None,
            Self::Full(payload) => Some(payload),
        }
    }
}

/// Single-slot valid-ready handshake register.
///
/// Decouples a producer from a consumer by holding at most one item. `in_ready` is high when the slot is
/// empty or the held item leaves in the same tick, so a full register still accepts one item per tick while
/// the consumer is ready.
///
/// # Note
///
/// The state table, with `in_fire = in_valid & in_ready` and `out_fire = occupied & out_ready`:
///
/// | State | `in_ready`  | `out_valid` | `in_fire`       | `out_fire` only | neither |
/// |-------|-------------|-------------|-----------------|-----------------|---------|
/// | Empty | 1           | 0           | Full(`in_data`) | (impossible)    | Empty   |
/// | Full  | `out_ready` | 1           | Full(`in_data`) | Empty           | Full    |
///
/// The held payload is discarded when the slot empties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRegister {
    config: RegisterConfig,
}

assert_impl_all!(HandshakeRegister: Send, Sync);
assert_impl_all!(Slot: Send, Sync);

impl HandshakeRegister {
    /// Creates a new handshake register.
    pub fn new(config: RegisterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!("handshake_register: DATA_WIDTH = {}", config.data_width);
        Ok(Self { config })
    }

    /// Creates a handshake register carrying values of type `V`.
    pub fn for_signal<V: Signal>() -> Result<Self, ConfigError> {
        if V::WIDTH == 0 {
            return Err(ConfigError::ZeroWidthSignal { typ: type_name::<V>() });
        }
        Self::new(RegisterConfig::default().with_data_width(V::WIDTH))
    }

    /// Configuration.
    pub fn config(&self) -> &RegisterConfig { &self.config }

    /// Payload width.
    pub fn data_width(&self) -> usize { self.config.data_width }

    /// Egress forward signals: `out_valid` and `out_data` are the registers themselves.
    pub fn egress_fwd(&self, s: &Slot) -> Valid<Bits> { s.payload().cloned().into() }

    /// Ingress backward signal: `in_ready = !occupied | out_fire`.
    pub fn ingress_bwd(&self, s: &Slot, o_bwd: &Ready) -> Ready {
        let out_fire = s.is_occupied() && o_bwd.ready;
        Ready::new(!s.is_occupied() || out_fire)
    }

    /// State leaving the tick.
    ///
    /// A captured payload is resized to `DATA_WIDTH`.
    pub fn next(&self, s: &Slot, i_fwd: &Valid<Bits>, o_bwd: &Ready) -> Slot {
        let in_ready = self.ingress_bwd(s, o_bwd);
        let out_fire = s.is_occupied() && o_bwd.ready;

        match i_fwd.inner().filter(|_| in_ready.ready) {
            Some(in_data) => Slot::Full(in_data.clone().resize(self.data_width())),
            None if out_fire => Slot::Empty,
            None => s.clone(),
        }
    }
}

impl Fsm for HandshakeRegister {
    type I = VrChannel<Bits>;
    type O = VrChannel<Bits>;
    type State = Slot;

    fn module_name(&self) -> String { "handshake_register".to_string() }

    fn init(&self) -> Slot { Slot::Empty }

    fn comb(&self, i_fwd: &Valid<Bits>, o_bwd: &Ready, s: &Slot) -> (Valid<Bits>, Ready, Slot) {
        (self.egress_fwd(s), self.ingress_bwd(s, o_bwd), self.next(s, i_fwd, o_bwd))
    }
}
