//! Gadget contract and lifecycle tracking.

use ff::PrimeField;

use crate::board::Board;
use crate::error::{Error, Result};

/// A reusable sub-circuit. Constructors allocate the gadget's variables;
/// `generate_constraints` emits its equations and `generate_witness` computes
/// and writes the values it owns, assuming its inputs are already assigned.
///
/// The board is lent for the duration of each call, so a gadget never holds
/// on to the board it was built on.
pub trait Gadget<F: PrimeField> {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()>;
    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GadgetState {
    #[default]
    Unconstructed,
    ConstraintsGenerated,
    WitnessGenerated,
}

impl GadgetState {
    /// Advance `Unconstructed -> ConstraintsGenerated`.
    pub fn begin_constraints(&mut self, gadget: &str) -> Result<()> {
        match self {
            GadgetState::Unconstructed => {
                *self = GadgetState::ConstraintsGenerated;
                Ok(())
            }
            state => Err(Error::InvalidGadgetState {
                gadget: gadget.to_string(),
                operation: "generate constraints",
                state: *state,
            }),
        }
    }

    /// Advance `ConstraintsGenerated -> WitnessGenerated`.
    pub fn begin_witness(&mut self, gadget: &str) -> Result<()> {
        match self {
            GadgetState::ConstraintsGenerated => {
                *self = GadgetState::WitnessGenerated;
                Ok(())
            }
            state => Err(Error::InvalidGadgetState {
                gadget: gadget.to_string(),
                operation: "generate witness",
                state: *state,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_order_is_enforced() {
        let mut s = GadgetState::default();
        assert!(matches!(s.begin_witness("g"), Err(Error::InvalidGadgetState { .. })));
        s.begin_constraints("g").unwrap();
        assert!(s.begin_constraints("g").is_err());
        s.begin_witness("g").unwrap();
        assert_eq!(s, GadgetState::WitnessGenerated);
        assert!(s.begin_witness("g").is_err());
        assert!(s.begin_constraints("g").is_err());
    }
}
