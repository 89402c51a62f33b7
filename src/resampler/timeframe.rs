//! Supported bar widths and epoch-aligned boundary arithmetic.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bar width, stored as whole seconds. Alignment is absolute to the Unix
/// epoch so independently running instances produce identical boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timeframe(pub i64);

impl Timeframe {
    pub const S1: Timeframe = Timeframe(1);
    pub const M1: Timeframe = Timeframe(60);
    pub const M5: Timeframe = Timeframe(300);
    pub const M15: Timeframe = Timeframe(900);
    pub const H1: Timeframe = Timeframe(3600);

    pub const ALL: [Timeframe; 5] = [Self::S1, Self::M1, Self::M5, Self::M15, Self::H1];

    pub fn seconds(self) -> i64 {
        self.0
    }

    /// Floor `t` to the start of the Δ-wide interval containing it:
    /// `epoch + floor((t - epoch)/Δ) * Δ`.
    pub fn align(self, t: DateTime<Utc>) -> DateTime<Utc> {
        let secs = t.timestamp();
        let floored = secs.div_euclid(self.0) * self.0;
        Utc.timestamp_opt(floored, 0).single().expect("in-range timestamp")
    }

    pub fn as_str(self) -> &'static str {
        match self.0 {
            1 => "1s",
            60 => "1m",
            300 => "5m",
            900 => "15m",
            3600 => "1h",
            _ => "custom",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1s" => Ok(Self::S1),
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "1h" => Ok(Self::H1),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_floors_to_boundary() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(900);
        assert_eq!(Timeframe::S1.align(t), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn align_on_exact_boundary_is_identity() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(Timeframe::S1.align(t), t);
    }

    #[test]
    fn roundtrip_str() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn unknown_str_errs() {
        assert!("3m".parse::<Timeframe>().is_err());
    }
}
