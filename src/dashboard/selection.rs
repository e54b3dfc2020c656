//! The user's choice of district and reporting period.

use std::fmt::Display;

use serde::Deserialize;

use crate::district::{District, Period};

/// The (district, period) pair that decides which report is fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub district: District,
    pub period: Period,
}

impl Selection {
    /// Replace the district. Any member of the district list is accepted.
    pub fn set_district(&mut self, district: District) {
        self.district = district;
    }

    /// Replace the reporting period.
    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.district, self.period)
    }
}

/// Form data sent by the district selector.
#[derive(Debug, Deserialize)]
pub struct DistrictForm {
    pub district: District,
}

/// Form data sent by the period selector.
#[derive(Debug, Deserialize)]
pub struct PeriodForm {
    pub period: Period,
}
