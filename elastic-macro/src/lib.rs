//! Implementation of `#[derive(Signal)]`.
//!
//! # Note
//!
//! Struct members are laid out LSB first in declaration order, so the first member occupies the lowest bits.
//! Enums must have unit variants only; each variant is encoded as its index unless it carries an
//! `#[encode(N)]` attribute, and the width is `clog2(#variants)` unless the enum carries `#[width(N)]`.
//!
//! ```ignore
//! #[derive(Debug, Clone, Signal)]
//! pub struct Beat {
//!     data: u32,
//!     last: bool,
//! }
//!
//! #[derive(Debug, Clone, Copy, Signal)]
//! #[width(2)]
//! pub enum Kind {
//!     Read,
//!     #[encode(3)]
//!     Write,
//! }
//! ```

mod signal;
mod utils;

use proc_macro::TokenStream;

#[proc_macro_derive(Signal, attributes(width, encode))]
pub fn signal(input: TokenStream) -> TokenStream { signal::derive(input) }
