// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt::{Debug, Display, Formatter};
use std::cmp::{Ord, Ordering};
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::ser::Serializer;
use serde::Serialize;

/// A number in the query value space.
///
/// Integers and floats form a single numeric cohort: they compare by
/// numeric value, and arithmetic prefers an integer result when both
/// operands are integers and the operation cannot produce a fraction.
#[derive(Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

use Number::*;

// Largest magnitude at which f64 still represents every integer exactly.
const EXACT_INT_MAX: f64 = 9_007_199_254_740_992.0;

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Int(i) => write!(f, "{i}"),
            Float(v) => write!(f, "{v}"),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Int(i) => write!(f, "{i}"),
            // Integral floats print without a fractional part.
            Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= EXACT_INT_MAX => {
                write!(f, "{}", *v as i64)
            }
            Float(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Int(i) => serializer.serialize_i64(*i),
            Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= EXACT_INT_MAX => {
                serializer.serialize_i64(*v as i64)
            }
            Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            // JSON has no NaN/infinity.
            Float(_) => serializer.serialize_none(),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Int(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Int(n as i64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Int(i),
            Err(_) => Float(n as f64),
        }
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        match i64::try_from(n) {
            Ok(i) => Int(i),
            Err(_) => Float(n as f64),
        }
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Float(n)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseNumberError;

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(i) = i64::from_str(s) {
            return Ok(Int(i));
        }
        Ok(Float(f64::from_str(s).map_err(|_| ParseNumberError)?))
    }
}

impl Number {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Int(i) => Some(*i),
            Float(v) if v.fract() == 0.0 && v.abs() <= EXACT_INT_MAX => Some(*v as i64),
            Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Int(i) => *i as f64,
            Float(v) => *v,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Int(_) => true,
            Float(v) => v.is_finite() && v.fract() == 0.0,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Float(v) if v.is_nan())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Int(i) => *i == 0,
            Float(v) => *v == 0.0,
        }
    }

    pub fn add(&self, rhs: &Self) -> Number {
        match (self, rhs) {
            (Int(a), Int(b)) => match a.checked_add(*b) {
                Some(c) => Int(c),
                None => Float(*a as f64 + *b as f64),
            },
            _ => Float(self.as_f64() + rhs.as_f64()),
        }
    }

    pub fn sub(&self, rhs: &Self) -> Number {
        match (self, rhs) {
            (Int(a), Int(b)) => match a.checked_sub(*b) {
                Some(c) => Int(c),
                None => Float(*a as f64 - *b as f64),
            },
            _ => Float(self.as_f64() - rhs.as_f64()),
        }
    }

    pub fn mul(&self, rhs: &Self) -> Number {
        match (self, rhs) {
            (Int(a), Int(b)) => match a.checked_mul(*b) {
                Some(c) => Int(c),
                None => Float(*a as f64 * *b as f64),
            },
            _ => Float(self.as_f64() * rhs.as_f64()),
        }
    }

    pub fn divide(&self, rhs: &Self) -> Result<Number> {
        if rhs.is_zero() {
            bail!("divide by zero");
        }
        Ok(match (self, rhs) {
            // An even integer division stays integral.
            (Int(a), Int(b)) if a % b == 0 => Int(a / b),
            _ => Float(self.as_f64() / rhs.as_f64()),
        })
    }

    /// Remainder with the sign of the dividend.
    pub fn modulo(&self, rhs: &Self) -> Result<Number> {
        if rhs.is_zero() {
            bail!("modulo by zero");
        }
        Ok(match (self, rhs) {
            (Int(a), Int(b)) => Int(a.wrapping_rem(*b)),
            _ => Float(self.as_f64() % rhs.as_f64()),
        })
    }

    pub fn abs(&self) -> Number {
        match self {
            Int(i) => match i.checked_abs() {
                Some(a) => Int(a),
                None => Float(-(*i as f64)),
            },
            Float(v) => Float(v.abs()),
        }
    }

    pub fn floor(&self) -> Number {
        match self {
            Int(i) => Int(*i),
            Float(v) => Float(v.floor()),
        }
    }

    pub fn ceil(&self) -> Number {
        match self {
            Int(i) => Int(*i),
            Float(v) => Float(v.ceil()),
        }
    }

    pub fn sqrt(&self) -> Number {
        Float(self.as_f64().sqrt())
    }

    /// Round half-to-even at the given decimal place. A negative place
    /// rounds to tens, hundreds and so on.
    pub fn round_place(&self, place: i32) -> Number {
        match self {
            Int(i) if place >= 0 => Int(*i),
            _ => self.requantize(self.rescale(place, round_half_to_even)),
        }
    }

    /// Truncate toward zero at the given decimal place.
    pub fn trunc_place(&self, place: i32) -> Number {
        match self {
            Int(i) if place >= 0 => Int(*i),
            _ => self.requantize(self.rescale(place, f64::trunc)),
        }
    }

    // Negative places divide by a power of ten rather than multiplying by
    // a fractional scale, which would not be exact in binary.
    fn rescale(&self, place: i32, adjust: fn(f64) -> f64) -> f64 {
        let v = self.as_f64();
        if place >= 0 {
            let scale = 10f64.powi(place);
            adjust(v * scale) / scale
        } else {
            let scale = 10f64.powi(-place);
            adjust(v / scale) * scale
        }
    }

    // An operation on an integer input keeps the integer type.
    fn requantize(&self, v: f64) -> Number {
        match self {
            Int(_) if v.is_finite() && v.abs() <= EXACT_INT_MAX => Int(v.round() as i64),
            _ => Float(v),
        }
    }
}

fn round_half_to_even(x: f64) -> f64 {
    let r = x.round();
    if (x - x.trunc()).abs() == 0.5 && r % 2.0 != 0.0 {
        r - (r - x).signum()
    } else {
        r
    }
}

impl Eq for Number {}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            // NaN sorts above every number and equal to itself, keeping
            // the ordering total.
            _ => {
                let (a, b) = (self.as_f64(), other.as_f64());
                match (a.is_nan(), b.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                }
            }
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
