pub mod model_based;
pub mod model_free;

use crate::error::{Error, Result};

pub(crate) fn check_epsilon(epsilon: f64) -> Result<f64> {
    if epsilon < 0. || epsilon.is_nan() {
        return Err(Error::InvalidEpsilon { value: epsilon });
    }

    Ok(epsilon)
}
