use std::fmt::Debug;
use std::str::FromStr;

/// T values are float numbers used for per-sample signals (z-scores and the like)
pub trait Float: ::num::Float + FromStr + Debug + Default {
    /// Largest-magnitude value with its sign preserved. The first value wins on ties.
    fn absmax(values: impl IntoIterator<Item = Self>) -> Option<Self> {
        values.into_iter().fold(None, |best, value| match best {
            Some(best) if best.abs() >= value.abs() => Some(best),
            _ => Some(value),
        })
    }
}

impl<T: ::num::Float + FromStr + Debug + Default> Float for T {}
