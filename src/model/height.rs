// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated item heights.
//!
//! Heights arrive from the host as string attributes. They are parsed once,
//! when the [`Balancer`][crate::actor::balancer::Balancer] is built, and any
//! value that could poison the shortest-column comparison is rejected here
//! instead of surfacing later as a skewed layout.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A finite item height.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Height(f64);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeightError {
    #[error("height attribute is missing")]
    Missing,
    #[error("height attribute is empty")]
    Empty,
    #[error("height attribute {0:?} is not a number")]
    NotNumeric(String),
    #[error("height {0} is not finite")]
    NotFinite(f64),
    #[error("height {0} is negative")]
    Negative(f64),
}

impl Height {
    pub const ZERO: Height = Height(0.0);

    pub fn new(value: f64) -> Result<Self, HeightError> {
        if value.is_finite() {
            Ok(Height(value))
        } else {
            Err(HeightError::NotFinite(value))
        }
    }

    /// Parses a string-encoded height attribute.
    ///
    /// Surrounding whitespace is ignored. Negative values parse successfully;
    /// whether they are allowed is up to the caller's policy.
    pub fn parse(attr: Option<&str>) -> Result<Self, HeightError> {
        let raw = attr.ok_or(HeightError::Missing)?.trim();
        if raw.is_empty() {
            return Err(HeightError::Empty);
        }
        let value: f64 = raw.parse().map_err(|_| HeightError::NotNumeric(raw.to_owned()))?;
        Height::new(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }
}

impl TryFrom<f64> for Height {
    type Error = HeightError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Height::new(value)
    }
}

impl From<Height> for f64 {
    fn from(height: Height) -> f64 {
        height.0
    }
}

impl Add<Height> for f64 {
    type Output = f64;

    fn add(self, rhs: Height) -> f64 {
        self + rhs.0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_plain_and_padded_numbers() {
        assert_eq!(Height::parse(Some("120")), Ok(Height(120.0)));
        assert_eq!(Height::parse(Some(" 12.5\n")), Ok(Height(12.5)));
        assert_eq!(Height::parse(Some("0")), Ok(Height::ZERO));
    }

    #[test]
    fn negative_heights_parse() {
        let height = Height::parse(Some("-4")).unwrap();
        assert!(height.is_negative());
    }

    #[test]
    fn rejects_values_that_would_poison_comparisons() {
        assert_eq!(Height::parse(None), Err(HeightError::Missing));
        assert_eq!(Height::parse(Some("  ")), Err(HeightError::Empty));
        assert_eq!(
            Height::parse(Some("tall")),
            Err(HeightError::NotNumeric("tall".into()))
        );
        assert!(matches!(Height::parse(Some("NaN")), Err(HeightError::NotFinite(_))));
        assert_eq!(
            Height::parse(Some("inf")),
            Err(HeightError::NotFinite(f64::INFINITY))
        );
    }

    #[test]
    fn deserialize_rejects_non_finite() {
        #[derive(Deserialize, Debug)]
        struct Wrapper {
            #[allow(dead_code)]
            height: Height,
        }
        assert!(toml::from_str::<Wrapper>("height = 3.0").is_ok());
        assert!(toml::from_str::<Wrapper>("height = nan").is_err());
    }
}
