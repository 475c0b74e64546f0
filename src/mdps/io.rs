//! Plain-text persistence for tabular models and experience.
//!
//! Both formats list, for every state `s`, every action `a` and every
//! successor `s1`, a pair of whitespace separated numbers; one line per `s`.
//! Models store `probability reward`, experiences store `visits reward`.

use super::{experience::Experience, mdp::*, model::Model};
use crate::common::utils::*;
use crate::error::{Error, Result};
use ndarray::{s, Array3};
use std::io::{Read, Write};
use std::str::FromStr;

pub fn write_model<W: Write>(writer: &mut W, model: &Model) -> Result<()> {
    let (n_s, n_a) = (model.n_s(), model.n_a());
    for s in 0..n_s {
        for a in 0..n_a {
            for s1 in 0..n_s {
                write!(
                    writer,
                    "{}\t{}\t",
                    model.transition_probability(s, a, s1),
                    model.expected_reward(s, a, s1)
                )?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Reads a model with the same dimensions as `model` into it.
///
/// Rows are normalized; a row with no probability mass becomes
/// self-absorbing. On failure `model` is left untouched.
pub fn read_model<R: Read>(reader: &mut R, model: &mut Model) -> Result<()> {
    let (n_s, n_a) = (model.n_s(), model.n_a());
    let mut tokens = Tokens::new(reader, "model")?;

    let mut transitions = Array3::zeros((n_s, n_a, n_s));
    let mut rewards = Array3::zeros((n_s, n_a, n_s));
    for s in 0..n_s {
        for a in 0..n_a {
            for s1 in 0..n_s {
                transitions[[s, a, s1]] = tokens.next::<f64>()?;
                rewards[[s, a, s1]] = tokens.next::<f64>()?;
            }

            let mut row = transitions.slice_mut(s![s, a, ..]);
            let sum = row.sum();
            if check_different_small(sum, 0.) {
                row /= sum;
            } else {
                row[s] = 1.;
            }
        }
    }

    model.set_transition_function(transitions)?;
    model.set_reward_function(rewards)
}

pub fn write_experience<W: Write>(writer: &mut W, exp: &Experience) -> Result<()> {
    let (n_s, n_a) = (exp.n_s(), exp.n_a());
    for s in 0..n_s {
        for a in 0..n_a {
            for s1 in 0..n_s {
                write!(writer, "{}\t{}\t", exp.visits(s, a, s1), exp.reward(s, a, s1))?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Reads an experience with the same dimensions as `exp` into it.
///
/// Rewards recorded for transitions with zero visits are dropped.
pub fn read_experience<R: Read>(reader: &mut R, exp: &mut Experience) -> Result<()> {
    let mut tokens = Tokens::new(reader, "experience")?;

    let mut e = Experience::new(exp.n_s(), exp.n_a());
    let (n_s, n_a) = (e.n_s(), e.n_a());
    for s in 0..n_s {
        for a in 0..n_a {
            for s1 in 0..n_s {
                let visits = tokens.next::<u64>()?;
                let reward = tokens.next::<f64>()?;
                e.visits[[s, a, s1]] = visits;
                e.rewards[[s, a, s1]] = if visits == 0 { 0. } else { reward };
            }
        }
    }
    e.rebuild_sums();
    *exp = e;

    Ok(())
}

struct Tokens {
    what: &'static str,
    items: Vec<String>,
    pos: usize,
}

impl Tokens {
    fn new<R: Read>(reader: &mut R, what: &'static str) -> Result<Self> {
        let mut data = String::new();
        reader.read_to_string(&mut data)?;

        Ok(Self {
            what,
            items: data.split_whitespace().map(str::to_string).collect(),
            pos: 0,
        })
    }

    fn next<T: FromStr>(&mut self) -> Result<T> {
        let token = self.pos;
        let item = self.items.get(token).ok_or_else(|| Error::Parse {
            what: self.what.to_string(),
            token,
            message: "unexpected end of input".to_string(),
        })?;
        self.pos += 1;

        item.parse::<T>().map_err(|_| Error::Parse {
            what: self.what.to_string(),
            token,
            message: format!("'{item}' is not a number"),
        })
    }
}
