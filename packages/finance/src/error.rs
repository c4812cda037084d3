use std::fmt::Debug;

use thiserror::Error;

use crate::percent::Units as PercentUnits;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("[Finance] Fraction multiplication overflow when evaluating `{details}`")]
    MultiplicationOverflow { details: String },

    #[error(
        "[Finance] [Percent] Upper bound has been crossed! Upper bound is: {bound}, but got: {value}!"
    )]
    UpperBoundCrossed {
        bound: PercentUnits,
        value: PercentUnits,
    },
}

impl Error {
    pub fn multiplication_overflow<L, R>(lhs: L, rhs: R) -> Self
    where
        L: Debug,
        R: Debug,
    {
        Self::MultiplicationOverflow {
            details: format!("({lhs:?}.of({rhs:?}))"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
