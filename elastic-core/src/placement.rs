//! Placement records
//!
//! A placement says where a key lives:
//! - the absolute slot in the table
//! - the subarray holding that slot
//! - the probe number that reached it

use std::fmt;

/// Location of a stored key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Absolute slot index
    pub slot: usize,

    /// Index of the subarray containing `slot`
    pub subarray: usize,

    /// Probe number `j` that landed on `slot`
    pub probe: usize,
}

impl Placement {
    pub fn new(slot: usize, subarray: usize, probe: usize) -> Self {
        Placement {
            slot,
            subarray,
            probe,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Placement(slot={}, subarray={}, probe={})",
            self.slot, self.subarray, self.probe
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_creation() {
        let placement = Placement::new(42, 1, 3);
        assert_eq!(placement.slot, 42);
        assert_eq!(placement.subarray, 1);
        assert_eq!(placement.probe, 3);
    }

    #[test]
    fn test_display() {
        let placement = Placement::new(800, 1, 0);
        assert_eq!(
            placement.to_string(),
            "Placement(slot=800, subarray=1, probe=0)"
        );
    }
}
