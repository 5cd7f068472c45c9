//! Pipe networks for the Atmos simulation kernel.
//!
//! Pipe segments live on the pipe layer of the grid. Adjacent segments
//! form a net, tracked incrementally as segments are placed and
//! removed. A net behaves as one pooled gas mixture: contents are
//! equalised across member segments and the pooled operations address
//! the net, not individual cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod graph;
pub mod net;

pub use graph::PipeGraph;
pub use net::PipeNet;
