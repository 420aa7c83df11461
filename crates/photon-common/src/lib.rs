//! Shared foundations for the Photon transpiler core: source spans,
//! the diagnostic error taxonomy (spec §7), and module-cycle detection.

pub mod error;
pub mod module_graph;
pub mod span;

pub use error::{PhotonError, PhotonResult};
pub use span::{LineIndex, Span};
