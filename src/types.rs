//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// The two observation points whose captures are correlated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapturePoint {
    /// The guest's virtual interface, as seen inside the hypervisor
    Vif,
    /// The hypervisor's physical interface
    Pif,
}

impl CapturePoint {
    /// Get a human-readable name for this capture point
    pub fn name(&self) -> &'static str {
        match self {
            CapturePoint::Vif => "virtual interface",
            CapturePoint::Pif => "physical interface",
        }
    }

    /// Suffix appended to the per-run capture file name
    pub fn file_suffix(&self) -> &'static str {
        match self {
            CapturePoint::Vif => "_vif",
            CapturePoint::Pif => "_pif",
        }
    }
}

/// Which capture point observed packets first, judged from the average delta
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkewDirection {
    /// Packets reach the vif after the pif (normal transit direction)
    VifLagsPif,
    /// Packets appear at the vif before the pif (clock skew or capture inversion)
    VifLeadsPif,
    /// Average delta is exactly zero
    Aligned,
}

impl SkewDirection {
    /// Classify the sign of an average delta in milliseconds
    pub fn from_average(average_ms: f64) -> Self {
        if average_ms > 0.0 {
            Self::VifLagsPif
        } else if average_ms < 0.0 {
            Self::VifLeadsPif
        } else {
            Self::Aligned
        }
    }

    /// One-line description for report output
    pub fn describe(&self) -> &'static str {
        match self {
            Self::VifLagsPif => "packets were seen at the physical interface first",
            Self::VifLeadsPif => "packets were seen at the virtual interface first",
            Self::Aligned => "both capture points observed packets at the same time on average",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_point_names() {
        assert_eq!(CapturePoint::Vif.file_suffix(), "_vif");
        assert_eq!(CapturePoint::Pif.file_suffix(), "_pif");
        assert!(CapturePoint::Vif.name().contains("virtual"));
    }

    #[test]
    fn test_skew_direction_from_average() {
        assert_eq!(SkewDirection::from_average(0.5), SkewDirection::VifLagsPif);
        assert_eq!(SkewDirection::from_average(-0.5), SkewDirection::VifLeadsPif);
        assert_eq!(SkewDirection::from_average(0.0), SkewDirection::Aligned);
    }
}
