//! Valid-ready channels.

use std::fmt::Debug;
use std::marker::PhantomData;

/// Interface: a bundle of forward and backward signals between two components.
///
/// `Fwd` flows from producer to consumer and `Bwd` flows back.
pub trait Interface: 'static {
    /// Forward signals.
    type Fwd: Debug + Clone;

    /// Backward signals.
    type Bwd: Debug + Clone;
}

/// Valid-ready channel.
#[derive(Debug, Clone, Copy)]
pub struct VrChannel<V> {
    _marker: PhantomData<V>,
}

impl<V: 'static + Debug + Clone> Interface for VrChannel<V> {
    type Bwd = Ready;
    type Fwd = Valid<V>;
}

/// Valid-ready channel's forward signals.
///
/// The data is don't-care while `valid` is low, so an invalid value carries none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Valid<V> {
    inner: Option<V>,
}

impl<V> Valid<V> {
    /// Creates new forward signals. `inner` is dropped if `valid` is low.
    pub fn new(valid: bool, inner: V) -> Self { Self { inner: valid.then_some(inner) } }

    /// Creates valid signals.
    pub fn valid(inner: V) -> Self { Self { inner: Some(inner) } }

    /// Creates invalid signals.
    pub fn invalid() -> Self { Self { inner: None } }

    /// Valid bit.
    pub fn is_valid(&self) -> bool { self.inner.is_some() }

    /// Inner data, if valid.
    pub fn inner(&self) -> Option<&V> { self.inner.as_ref() }

    /// Consumes into the inner data, if valid.
    pub fn into_inner(self) -> Option<V> { self.inner }

    /// Maps the inner value.
    pub fn map_inner<W, F: FnOnce(V) -> W>(self, f: F) -> Valid<W> { Valid { inner: self.inner.map(f) } }
}

impl<V> Default for Valid<V> {
    fn default() -> Self { Self::invalid() }
}

impl<V> From<Option<V>> for Valid<V> {
    fn from(inner: Option<V>) -> Self { Self { inner } }
}

/// Ready signal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ready {
    /// Ready bit
    pub ready: bool,
}

impl Ready {
    /// Creates a new ready signal.
    pub fn new(ready: bool) -> Self { Self { ready } }
}

/// Signals on one edge of a valid-ready channel, sampled at one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<V> {
    /// Forward signals.
    pub fwd: Valid<V>,

    /// Backward signals.
    pub bwd: Ready,
}

impl<V> Edge<V> {
    /// Creates a new edge.
    pub fn new(fwd: Valid<V>, bwd: Ready) -> Self { Self { fwd, bwd } }

    /// Returns fire signal. (fire signal: valid & ready)
    pub fn fire(&self) -> bool { self.fwd.is_valid() && self.bwd.ready }

    /// Transferred value, if the edge fires.
    pub fn transfer(&self) -> Option<&V> { self.fwd.inner().filter(|_| self.bwd.ready) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_needs_valid_and_ready() {
        for (valid, ready) in [(false, false), (false, true), (true, false), (true, true)] {
            let edge = Edge::new(Valid::new(valid, 7u8), Ready::new(ready));
            assert_eq!(edge.fire(), valid && ready);
            assert_eq!(edge.transfer().copied(), (valid && ready).then_some(7));
        }
    }

    #[test]
    fn invalid_carries_no_data() {
        let fwd = Valid::new(false, 3u8);
        assert!(!fwd.is_valid());
        assert_eq!(fwd.inner(), None);
        assert_eq!(Valid::valid(3u8).map_inner(|v| v * 2).into_inner(), Some(6));
    }
}
