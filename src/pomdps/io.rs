//! JSON persistence for computed value functions.
//!
//! Every entry keeps its values, action and observation map, so a stored
//! value function can be reloaded into a `Policy` and followed again.

use super::types::ValueFunction;
use crate::error::{Error, Result};
use std::io::{Read, Write};

pub fn write_value_function<W: Write>(writer: W, vf: &ValueFunction) -> Result<()> {
    serde_json::to_writer(writer, vf)?;

    Ok(())
}

/// Loads a value function and checks that it is consistent: all vectors
/// and all observation maps share one length, and every observation index
/// at horizon `t` points into horizon `t - 1`.
pub fn read_value_function<R: Read>(reader: R) -> Result<ValueFunction> {
    let vf: ValueFunction = serde_json::from_reader(reader)?;
    check_value_function(&vf)?;

    Ok(vf)
}

fn check_value_function(vf: &ValueFunction) -> Result<()> {
    let Some(first) = vf.iter().flatten().next() else {
        return Ok(());
    };
    let (n_s, n_o) = (first.values.len(), first.observations.len());

    for (t, list) in vf.iter().enumerate() {
        for (i, e) in list.iter().enumerate() {
            if e.values.len() != n_s || e.observations.len() != n_o {
                return Err(Error::DimensionMismatch {
                    what: format!("entry {i} of horizon {t}"),
                    expected: vec![n_s, n_o],
                    got: vec![e.values.len(), e.observations.len()],
                });
            }
            if t == 0 {
                continue;
            }

            let n_prev = vf[t - 1].len();
            if let Some(o) = e.observations.iter().position(|&id| id >= n_prev) {
                return Err(Error::Parse {
                    what: format!("observation map of entry {i} of horizon {t}"),
                    token: o,
                    message: format!(
                        "index {} is out of range for {n_prev} vectors",
                        e.observations[o]
                    ),
                });
            }
        }
    }

    Ok(())
}
