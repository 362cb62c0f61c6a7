//! Port types with validation.
//!
//! Every `u16` is a valid `Port` (0-65535). Validation only happens at the
//! edge, where endpoints arrive as wider signed integers from the command line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A network port number (0-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 0;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port.
    #[inline]
    pub const fn new(port: u16) -> Self {
        Self(port)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Port {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl TryFrom<i64> for Port {
    type Error = PortError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .map(Self)
            .map_err(|_| PortError::OutOfRange(value))
    }
}

/// Error type for port validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (0-65535)")]
    OutOfRange(i64),
    #[error("expected exactly two ports (first and last), got {0}")]
    MissingBounds(usize),
}

/// Validate both endpoints of a user-supplied range.
///
/// `first > last` is accepted and yields an empty range.
pub fn validate_range(first: i64, last: i64) -> Result<PortRange, PortError> {
    let first = Port::try_from(first)?;
    let last = Port::try_from(last)?;
    Ok(PortRange::new(first, last))
}

/// An inclusive range of ports, iterated in ascending order.
///
/// `first <= last` is not enforced; a reversed range is simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    first: Port,
    last: Port,
}

impl PortRange {
    /// Create a new port range.
    pub const fn new(first: Port, last: Port) -> Self {
        Self { first, last }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            first: port,
            last: port,
        }
    }

    pub const fn first(&self) -> Port {
        self.first
    }

    pub const fn last(&self) -> Port {
        self.last
    }

    /// Number of ports in this range.
    pub const fn len(&self) -> usize {
        if self.first.0 > self.last.0 {
            0
        } else {
            (self.last.0 - self.first.0) as usize + 1
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.first.0 > self.last.0
    }

    /// Check whether `port` lies inside the range.
    pub fn contains(&self, port: Port) -> bool {
        self.first <= port && port <= self.last
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.first.0..=self.last.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.first, self.last)
    }
}
