//! Column schema of the PEDOT:PSS experiment file
//!
//! The experiment varies seven coating parameters and records two outcomes.
//! Parameters are offered on the x-axis, outcomes on the y-axis.

use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};

/// Input parameters, in the order they appear in the x-axis dropdown
pub const PARAMETER_COLUMNS: [&str; 7] = [
    "DMSO concentration (Vol%)",
    "EG concentration (Vol%)",
    "Coating speed (mm/sec)",
    "Coating temperature (Celsius)",
    "Post-processing solvent No.",
    "Post coating speed (mm/sec)",
    "Post coating temperature (Celsius)",
];

/// Measured outcomes, in the order they appear in the y-axis dropdown
pub const OUTPUT_COLUMNS: [&str; 2] = ["Average coverage (%)", "Average conductivity (S/cm)"];

/// Every column the dashboard reads by name
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    PARAMETER_COLUMNS.iter().chain(OUTPUT_COLUMNS.iter()).copied()
}

/// The pair of columns driving the scatter plot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x: String,
    pub y: String,
}

impl Default for AxisSelection {
    fn default() -> Self {
        Self {
            x: PARAMETER_COLUMNS[0].to_string(),
            y: OUTPUT_COLUMNS[0].to_string(),
        }
    }
}

impl AxisSelection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self { x: x.into(), y: y.into() }
    }

    /// Reject names the dropdowns could never have produced
    pub fn validate(&self) -> Result<()> {
        if !PARAMETER_COLUMNS.contains(&self.x.as_str()) {
            return Err(DashError::InvalidAxis { axis: 'x', value: self.x.clone() });
        }
        if !OUTPUT_COLUMNS.contains(&self.y.as_str()) {
            return Err(DashError::InvalidAxis { axis: 'y', value: self.y.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_is_first_of_each_list() {
        let sel = AxisSelection::default();
        assert_eq!(sel.x, "DMSO concentration (Vol%)");
        assert_eq!(sel.y, "Average coverage (%)");
        assert!(sel.validate().is_ok());
    }

    #[test]
    fn test_every_listed_pair_is_valid() {
        for x in PARAMETER_COLUMNS {
            for y in OUTPUT_COLUMNS {
                assert!(AxisSelection::new(x, y).validate().is_ok(), "{} / {}", x, y);
            }
        }
    }

    #[test]
    fn test_output_on_x_axis_is_rejected() {
        // Outcomes are only offered on the y-axis
        let sel = AxisSelection::new(OUTPUT_COLUMNS[1], OUTPUT_COLUMNS[0]);
        match sel.validate() {
            Err(DashError::InvalidAxis { axis, value }) => {
                assert_eq!(axis, 'x');
                assert_eq!(value, OUTPUT_COLUMNS[1]);
            }
            other => panic!("expected InvalidAxis, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_y_is_rejected() {
        let sel = AxisSelection::new(PARAMETER_COLUMNS[0], "Sheet resistance");
        assert!(matches!(sel.validate(), Err(DashError::InvalidAxis { axis: 'y', .. })));
    }

    #[test]
    fn test_required_columns_count() {
        assert_eq!(required_columns().count(), 9);
    }
}
