//! Elastic: cycle-level valid/ready handshake components with Verilog output.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_import_braces)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::bare_urls)]

pub mod channel;
pub mod fsm;
pub mod monitor;
pub mod package;
pub mod signal;
pub mod sim;
pub mod utils;
pub mod vir;

pub use channel::*;
pub use elastic_macro::Signal;
pub use fsm::Fsm;
pub use monitor::{EdgeMonitor, ProtocolChecker, ProtocolError, Scoreboard, Side};
pub use package::{Package, PackageError};
pub use signal::{Bits, Signal};
pub use sim::{Cycle, Simulator};
pub use utils::*;
