//! `x^3 + x + 5 = out`, the smallest end-to-end circuit.

use board::{Board, Gadget, GadgetState, LinearCombination, Result, Variable};
use ff::PrimeField;

/// Allocates `x, sym_1, y, sym_2, out` in that order so `x` can be declared
/// the single primary input.
#[derive(Clone, Debug)]
pub struct CubicIdentityGadget {
    pub x: Variable,
    pub sym_1: Variable,
    pub y: Variable,
    pub sym_2: Variable,
    pub out: Variable,
    state: GadgetState,
}

impl CubicIdentityGadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>) -> Self {
        Self {
            x: board.allocate("x"),
            sym_1: board.allocate("sym_1"),
            y: board.allocate("y"),
            sym_2: board.allocate("sym_2"),
            out: board.allocate("out"),
            state: GadgetState::default(),
        }
    }
}

impl<F: PrimeField> Gadget<F> for CubicIdentityGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints("cubic")?;
        board.add_constraint(self.x.into(), self.x.into(), self.sym_1.into(), "x*x = sym_1")?;
        board.add_constraint(self.sym_1.into(), self.x.into(), self.y.into(), "sym_1*x = y")?;
        board.enforce_equal(LinearCombination::from(self.y) + self.x, self.sym_2.into(), "y + x = sym_2")?;
        board.enforce_equal(
            LinearCombination::from(self.sym_2).add_constant(F::from(5u64)),
            self.out.into(),
            "sym_2 + 5 = out",
        )
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_witness("cubic")?;
        let x = board.value(self.x)?;
        let sym_1 = x * x;
        let y = sym_1 * x;
        let sym_2 = y + x;
        board.assign(self.sym_1, sym_1)?;
        board.assign(self.y, y)?;
        board.assign(self.sym_2, sym_2)?;
        board.assign(self.out, sym_2 + F::from(5u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::{Error, Params};

    type Fr = pasta_curves::Fp;

    #[test]
    fn wrong_output_is_caught() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let mut g = CubicIdentityGadget::new(&mut b);
        b.set_primary_input_count(1).unwrap();
        g.generate_constraints(&mut b).unwrap();
        b.assign(g.x, Fr::from(2u64)).unwrap();
        b.assign(g.sym_1, Fr::from(4u64)).unwrap();
        b.assign(g.y, Fr::from(8u64)).unwrap();
        b.assign(g.sym_2, Fr::from(10u64)).unwrap();
        b.assign(g.out, Fr::from(16u64)).unwrap();
        let (index, annotation) = b.first_unsatisfied().unwrap().unwrap();
        assert_eq!(index, 3);
        assert_eq!(annotation.as_deref(), Some("sym_2 + 5 = out"));
    }

    #[test]
    fn witness_needs_x() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let mut g = CubicIdentityGadget::new(&mut b);
        g.generate_constraints(&mut b).unwrap();
        assert!(matches!(g.generate_witness(&mut b), Err(Error::UnassignedVariable(v)) if v == g.x));
    }
}
