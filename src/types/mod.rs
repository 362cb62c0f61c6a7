//! Core type definitions using newtype patterns for type safety.

mod port;
mod target;

pub use port::{validate_range, Port, PortError, PortRange};
pub use target::{ScanTarget, TargetError, TargetSpec};
