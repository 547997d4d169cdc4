//! Addition of 32-bit words modulo 2^32.
//!
//! The operands are summed as field integers through their packed linear
//! combinations, then the sum is re-decomposed into 32 boolean result bits
//! and a small carry:
//!
//! ```text
//! sum(operands) = carry * 2^32 + result
//! ```
//!
//! With `k` operands the carry is below `k`, so it is range-checked by
//! decomposing it into `ceil(log2 k)` boolean bits. A sum of at most a handful
//! of words stays far below the field modulus, so the decomposition is unique.

use board::{Board, Error, Gadget, GadgetState, LinearCombination, Result, Variable};
use ff::PrimeField;

use crate::bits::{Word, WORD_BITS};

#[derive(Clone, Debug)]
pub struct ModularAddGadget {
    operands: Vec<Word>,
    result: Word,
    result_vars: Vec<Variable>,
    carry: Vec<Variable>,
    annotation: String,
    state: GadgetState,
}

/// Number of carry bits needed for a sum of `operands` 32-bit words.
pub fn carry_bits(operands: usize) -> usize {
    match operands {
        0 | 1 => 0,
        k => (usize::BITS - (k - 1).leading_zeros()) as usize,
    }
}

impl ModularAddGadget {
    /// Allocates 32 fresh result bits.
    pub fn new<F: PrimeField>(board: &mut Board<F>, operands: Vec<Word>, annotation: &str) -> Self {
        let result_vars = board.allocate_vec(WORD_BITS, &format!("{annotation}.result"));
        Self::build(board, operands, result_vars, annotation)
    }

    /// Writes the result into caller-owned bits (least significant first),
    /// e.g. the bits of an output digest.
    pub fn with_result<F: PrimeField>(
        board: &mut Board<F>,
        operands: Vec<Word>,
        result_vars: Vec<Variable>,
        annotation: &str,
    ) -> Result<Self> {
        if result_vars.len() != WORD_BITS {
            return Err(Error::LengthMismatch { expected: WORD_BITS, actual: result_vars.len() });
        }
        Ok(Self::build(board, operands, result_vars, annotation))
    }

    fn build<F: PrimeField>(board: &mut Board<F>, operands: Vec<Word>, result_vars: Vec<Variable>, annotation: &str) -> Self {
        let carry = board.allocate_vec(carry_bits(operands.len()), &format!("{annotation}.carry"));
        let result = Word::from_bits(core::array::from_fn(|i| result_vars[i].into()));
        Self { operands, result, result_vars, carry, annotation: annotation.to_string(), state: GadgetState::default() }
    }

    #[inline]
    pub fn result(&self) -> &Word { &self.result }

    #[inline]
    pub fn carry(&self) -> &[Variable] { &self.carry }
}

impl<F: PrimeField> Gadget<F> for ModularAddGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        for (i, &v) in self.result_vars.iter().enumerate() {
            board.enforce_boolean(v, format!("{}.result[{i}] boolean", self.annotation))?;
        }
        for (j, &v) in self.carry.iter().enumerate() {
            board.enforce_boolean(v, format!("{}.carry[{j}] boolean", self.annotation))?;
        }

        let sum = self.operands.iter().fold(LinearCombination::<F>::zero(), |acc, w| acc + w.packed());
        let mut decomposed = self.result.packed::<F>();
        for (j, &v) in self.carry.iter().enumerate() {
            decomposed.push_term(v, F::from(1u64 << (WORD_BITS + j)));
        }
        board.enforce_equal(sum, decomposed, format!("{} sum = carry*2^32 + result", self.annotation))
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        let mut sum = 0u64;
        for w in &self.operands {
            sum += u64::from(w.value(board)?);
        }
        self.state.begin_witness(&self.annotation)?;
        self.result.assign(board, sum as u32)?;
        let carry = sum >> WORD_BITS;
        for (j, &v) in self.carry.iter().enumerate() {
            board.assign_bit(v, (carry >> j) & 1 == 1)?;
        }
        Ok(())
    }
}
