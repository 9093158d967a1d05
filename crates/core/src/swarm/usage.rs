//! # Usage Meter
//!
//! Approximate consumption accounting: four characters per unit, priced
//! per million units. Not billing-grade.

use serde::{Deserialize, Serialize};

/// Characters per consumption unit
pub const CHARS_PER_UNIT: usize = 4;

/// Flash-tier price in USD per million units
pub const DEFAULT_UNIT_PRICE_PER_MILLION: f64 = 0.10;

/// Running totals for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub units: u64,
    pub cost: f64,
}

impl UsageStats {
    /// Pure addition into the running totals
    pub fn accumulate(self, units: u64, cost: f64) -> Self {
        Self {
            units: self.units + units,
            cost: self.cost + cost,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UsageMeter {
    unit_price_per_million: f64,
}

impl Default for UsageMeter {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_PRICE_PER_MILLION)
    }
}

impl UsageMeter {
    pub fn new(unit_price_per_million: f64) -> Self {
        Self {
            unit_price_per_million: unit_price_per_million.max(0.0),
        }
    }

    /// Units and cost for one generated response
    pub fn record(&self, text: &str) -> (u64, f64) {
        let chars = text.chars().count();
        let units = chars.div_ceil(CHARS_PER_UNIT) as u64;
        let cost = units as f64 / 1_000_000.0 * self.unit_price_per_million;
        (units, cost)
    }
}
