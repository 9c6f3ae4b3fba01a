//! Protocol checking for valid-ready components.
//!
//! The monitors here are a verification harness, not part of any component: they watch the edges of a
//! simulated component and report the first violation of the valid-ready contract.

use std::collections::VecDeque;
use std::fmt::{self, Debug};

use log::{debug, warn};
use thiserror::Error;

use crate::channel::*;
use crate::sim::Cycle;

/// Side of a component an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Ingress edge, driven by the producer.
    Upstream,

    /// Egress edge, driven by the component itself.
    Downstream,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream => write!(f, "upstream"),
            Self::Downstream => write!(f, "downstream"),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("cycle {cycle}: {side} withdrew `valid` before the transfer")]
    ValidWithdrawn { cycle: u64, side: Side },

    #[error("cycle {cycle}: {side} changed data from {before} to {after} before the transfer")]
    DataChanged { cycle: u64, side: Side, before: String, after: String },

    #[error("cycle {cycle}: delivered {found} but nothing was in flight")]
    Fabricated { cycle: u64, found: String },

    #[error("cycle {cycle}: item #{index} delivered as {found}, expected {expected}")]
    Mismatch { cycle: u64, index: u64, expected: String, found: String },

    #[error("cycle {cycle}: {outstanding} items in flight exceeds capacity {capacity}")]
    Overflow { cycle: u64, outstanding: usize, capacity: usize },
}

/// Checks that a pending offer on one edge stays stable until it is transferred.
///
/// Once `valid` is asserted without `ready`, the next tick must present `valid` again with the same data.
#[derive(Debug, Clone)]
pub struct EdgeMonitor<V> {
    side: Side,
    pending: Option<V>,
}

impl<V: Debug + Clone + PartialEq> EdgeMonitor<V> {
    /// Creates a new monitor.
    pub fn new(side: Side) -> Self { Self { side, pending: None } }

    /// Offer waiting for a transfer, if any.
    pub fn pending(&self) -> Option<&V> { self.pending.as_ref() }

    /// Observes the edge at one tick.
    pub fn observe(&mut self, cycle: u64, edge: &Edge<V>) -> Result<(), ProtocolError> {
        if let Some(before) = self.pending.take() {
            match edge.fwd.inner() {
                None => return Err(ProtocolError::ValidWithdrawn { cycle, side: self.side }),
                Some(after) if *after != before => {
                    return Err(ProtocolError::DataChanged {
                        cycle,
                        side: self.side,
                        before: format!("{:?}", before),
                        after: format!("{:?}", after),
                    })
                }
                Some(_) => {}
            }
        }

        if !edge.bwd.ready {
            self.pending = edge.fwd.inner().cloned();
        }
        Ok(())
    }

    /// Forgets the pending offer.
    pub fn reset(&mut self) { self.pending = None; }
}

/// Checks exactly-once, in-order delivery through a component holding at most `capacity` items.
#[derive(Debug, Clone)]
pub struct Scoreboard<V> {
    capacity: usize,
    in_flight: VecDeque<V>,
    accepted: u64,
    delivered: u64,
}

impl<V: Debug + Clone + PartialEq> Scoreboard<V> {
    /// Creates a new scoreboard.
    pub fn new(capacity: usize) -> Self { Self { capacity, in_flight: VecDeque::new(), accepted: 0, delivered: 0 } }

    /// Number of items accepted so far.
    pub fn accepted(&self) -> u64 { self.accepted }

    /// Number of items delivered so far.
    pub fn delivered(&self) -> u64 { self.delivered }

    /// Number of items accepted but not delivered.
    pub fn outstanding(&self) -> usize { self.in_flight.len() }

    /// Observes the transfers of one tick.
    ///
    /// The delivered item is matched before the accepted one is recorded: a component delivers what it held
    /// when the tick started.
    pub fn observe(&mut self, cycle: u64, accepted: Option<&V>, delivered: Option<&V>) -> Result<(), ProtocolError> {
        if let Some(found) = delivered {
            let expected = self
                .in_flight
                .pop_front()
                .ok_or_else(|| ProtocolError::Fabricated { cycle, found: format!("{:?}", found) })?;
            if expected != *found {
                return Err(ProtocolError::Mismatch {
                    cycle,
                    index: self.delivered,
                    expected: format!("{:?}", expected),
                    found: format!("{:?}", found),
                });
            }
            self.delivered += 1;
        }

        if let Some(value) = accepted {
            self.in_flight.push_back(value.clone());
            self.accepted += 1;
        }

        if self.in_flight.len() > self.capacity {
            return Err(ProtocolError::Overflow { cycle, outstanding: self.in_flight.len(), capacity: self.capacity });
        }
        Ok(())
    }

    /// Discards the items in flight. Returns how many were discarded.
    pub fn flush(&mut self) -> usize {
        let flushed = self.in_flight.len();
        self.in_flight.clear();
        flushed
    }
}

/// Checks both edges of a valid-ready component, cycle by cycle.
///
/// The upstream monitor catches a misbehaving producer; the downstream monitor and the scoreboard catch a
/// misbehaving component. Reset discards whatever was in flight.
#[derive(Debug, Clone)]
pub struct ProtocolChecker<V> {
    upstream: EdgeMonitor<V>,
    downstream: EdgeMonitor<V>,
    scoreboard: Scoreboard<V>,
}

impl<V: 'static + Debug + Clone + PartialEq> ProtocolChecker<V> {
    /// Creates a new checker for a component holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            upstream: EdgeMonitor::new(Side::Upstream),
            downstream: EdgeMonitor::new(Side::Downstream),
            scoreboard: Scoreboard::new(capacity),
        }
    }

    /// Scoreboard.
    pub fn scoreboard(&self) -> &Scoreboard<V> { &self.scoreboard }

    /// Observes one simulated tick.
    ///
    /// A reset asserted during the tick, or pulsed since the previous one, discards the items in flight. Transfers
    /// of a tick that only follows a pulse are still checked.
    pub fn observe(&mut self, cycle: &Cycle<VrChannel<V>, VrChannel<V>>) -> Result<(), ProtocolError> {
        if cycle.reset || cycle.reset_pulsed {
            let flushed = self.scoreboard.flush();
            if flushed > 0 {
                debug!("cycle {}: reset discarded {} item(s) in flight", cycle.index, flushed);
            }
            self.upstream.reset();
            self.downstream.reset();
        }
        if cycle.reset {
            return Ok(());
        }

        let result = self.check(cycle);
        if let Err(error) = &result {
            warn!("{}", error);
        }
        result
    }

    fn check(&mut self, cycle: &Cycle<VrChannel<V>, VrChannel<V>>) -> Result<(), ProtocolError> {
        self.upstream.observe(cycle.index, &cycle.in_edge())?;
        self.downstream.observe(cycle.index, &cycle.out_edge())?;
        self.scoreboard.observe(cycle.index, cycle.accepted(), cycle.delivered())
    }
}
