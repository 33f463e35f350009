// ABOUTME: Conversion of caller-supplied values into a capacity bound.
// ABOUTME: Negative, fractional, and unparsable inputs become InvalidBound.

use crate::error::GateError;

/// A value that can be used as a gate's capacity bound.
///
/// Implemented for the primitive integers, finite whole floats, and strings
/// holding a non-negative integer.
pub trait IntoBound {
    fn into_bound(self) -> Result<usize, GateError>;
}

macro_rules! impl_into_bound_for_int {
    ($($ty:ty),*) => {
        $(
            impl IntoBound for $ty {
                fn into_bound(self) -> Result<usize, GateError> {
                    usize::try_from(self).map_err(|_| {
                        GateError::InvalidBound(format!("{} is not a non-negative integer", self))
                    })
                }
            }
        )*
    };
}

impl_into_bound_for_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl IntoBound for f64 {
    fn into_bound(self) -> Result<usize, GateError> {
        if self.is_finite() && self >= 0.0 && self.fract() == 0.0 && self <= usize::MAX as f64 {
            Ok(self as usize)
        } else {
            Err(GateError::InvalidBound(format!(
                "{} is not a non-negative integer",
                self
            )))
        }
    }
}

impl IntoBound for &str {
    fn into_bound(self) -> Result<usize, GateError> {
        self.trim().parse::<usize>().map_err(|_| {
            GateError::InvalidBound(format!("{:?} is not a non-negative integer", self))
        })
    }
}

impl IntoBound for String {
    fn into_bound(self) -> Result<usize, GateError> {
        self.as_str().into_bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(3usize.into_bound(), Ok(3));
        assert_eq!(0i32.into_bound(), Ok(0));
        assert!(matches!((-1i64).into_bound(), Err(GateError::InvalidBound(_))));
    }

    #[test]
    fn test_floats() {
        assert_eq!(4.0f64.into_bound(), Ok(4));
        assert!(2.5f64.into_bound().is_err());
        assert!((-1.0f64).into_bound().is_err());
        assert!(f64::NAN.into_bound().is_err());
        assert!(f64::INFINITY.into_bound().is_err());
    }

    #[test]
    fn test_strings() {
        assert_eq!(" 7 ".into_bound(), Ok(7));
        assert_eq!(String::from("0").into_bound(), Ok(0));
        assert!("-2".into_bound().is_err());
        assert!("1.5".into_bound().is_err());
        assert!("".into_bound().is_err());
    }
}
