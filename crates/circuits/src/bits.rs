//! Boolean wires and 32-bit words.
//!
//! A [`Word`] is 32 [`Bit`]s, least significant first. Rotations and shifts
//! only permute (or zero-fill) those wires and never touch the board.

use board::{Board, Error, LinearCombination, Result, Variable};
use ff::PrimeField;

pub const WORD_BITS: usize = 32;

/// A boolean wire: an allocated variable or a fixed bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bit {
    Var(Variable),
    Const(bool),
}

impl From<Variable> for Bit {
    fn from(v: Variable) -> Self { Bit::Var(v) }
}

impl Bit {
    pub fn lc<F: PrimeField>(&self) -> LinearCombination<F> {
        match *self {
            Bit::Var(v) => v.into(),
            Bit::Const(b) => LinearCombination::constant(if b { F::ONE } else { F::ZERO }),
        }
    }

    #[inline]
    pub fn is_const_zero(&self) -> bool { matches!(self, Bit::Const(false)) }

    pub fn constant_value(&self) -> Option<bool> {
        match *self {
            Bit::Const(b) => Some(b),
            Bit::Var(_) => None,
        }
    }

    pub fn variable(&self) -> Option<Variable> {
        match *self {
            Bit::Var(v) => Some(v),
            Bit::Const(_) => None,
        }
    }

    pub fn value<F: PrimeField>(&self, board: &Board<F>) -> Result<bool> {
        match *self {
            Bit::Var(v) => board.bit_value(v),
            Bit::Const(b) => Ok(b),
        }
    }

    /// Field value of the wire; fails if a variable is unassigned.
    pub fn field_value<F: PrimeField>(&self, board: &Board<F>) -> Result<F> {
        board.evaluate(&self.lc())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    bits: [Bit; WORD_BITS],
}

impl Word {
    pub fn from_bits(bits: [Bit; WORD_BITS]) -> Self { Self { bits } }

    pub fn constant(value: u32) -> Self {
        Self { bits: core::array::from_fn(|i| Bit::Const((value >> i) & 1 == 1)) }
    }

    pub fn allocate<F: PrimeField>(board: &mut Board<F>, name: &str) -> Self {
        Self { bits: core::array::from_fn(|i| Bit::Var(board.allocate(format!("{name}[{i}]")))) }
    }

    /// Build from least-significant-first variables.
    pub fn from_variables(vars: &[Variable]) -> Result<Self> {
        if vars.len() != WORD_BITS {
            return Err(Error::LengthMismatch { expected: WORD_BITS, actual: vars.len() });
        }
        Ok(Self { bits: core::array::from_fn(|i| Bit::Var(vars[i])) })
    }

    /// Build from most-significant-first variables (big-endian bit order).
    pub fn from_variables_msb_first(vars: &[Variable]) -> Result<Self> {
        if vars.len() != WORD_BITS {
            return Err(Error::LengthMismatch { expected: WORD_BITS, actual: vars.len() });
        }
        Ok(Self { bits: core::array::from_fn(|i| Bit::Var(vars[WORD_BITS - 1 - i])) })
    }

    #[inline]
    pub fn bits(&self) -> &[Bit; WORD_BITS] { &self.bits }

    #[inline]
    pub fn bit(&self, i: usize) -> Bit { self.bits[i] }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.bits.iter().filter_map(Bit::variable)
    }

    pub fn rotate_right(&self, n: usize) -> Self {
        Self { bits: core::array::from_fn(|i| self.bits[(i + n) % WORD_BITS]) }
    }

    pub fn shift_right(&self, n: usize) -> Self {
        Self { bits: core::array::from_fn(|i| if i + n < WORD_BITS { self.bits[i + n] } else { Bit::Const(false) }) }
    }

    /// sum_i 2^i * bit_i, constant bits folded into the constant term.
    pub fn packed<F: PrimeField>(&self) -> LinearCombination<F> {
        let mut lc = LinearCombination::zero();
        for (i, bit) in self.bits.iter().enumerate() {
            let weight = F::from(1u64 << i);
            match *bit {
                Bit::Var(v) => lc.push_term(v, weight),
                Bit::Const(true) => lc.constant += weight,
                Bit::Const(false) => {}
            }
        }
        lc
    }

    pub fn value<F: PrimeField>(&self, board: &Board<F>) -> Result<u32> {
        let mut out = 0u32;
        for (i, bit) in self.bits.iter().enumerate() {
            if bit.value(board)? {
                out |= 1 << i;
            }
        }
        Ok(out)
    }

    /// Assign the variable bits of this word from `value`. Constant bits are
    /// fixed already and left alone.
    pub fn assign<F: PrimeField>(&self, board: &mut Board<F>, value: u32) -> Result<()> {
        for (i, bit) in self.bits.iter().enumerate() {
            if let Bit::Var(v) = *bit {
                board.assign_bit(v, (value >> i) & 1 == 1)?;
            }
        }
        Ok(())
    }

    pub fn enforce_boolean<F: PrimeField>(&self, board: &mut Board<F>, annotation: &str) -> Result<()> {
        for (i, bit) in self.bits.iter().enumerate() {
            if let Bit::Var(v) = *bit {
                board.enforce_boolean(v, format!("{annotation}[{i}]"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::Params;

    type Fr = pasta_curves::Fp;

    fn assigned_word(board: &mut Board<Fr>, value: u32) -> Word {
        let w = Word::allocate(board, "w");
        w.enforce_boolean(board, "w").unwrap();
        w.assign(board, value).unwrap();
        w
    }

    #[test]
    fn rotation_and_shift_match_native_and_are_free() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let value = 0x8000_0001u32 ^ 0x1234_5678;
        let w = assigned_word(&mut b, value);
        let before = b.num_constraints();
        for n in [0usize, 1, 7, 13, 22, 31] {
            assert_eq!(w.rotate_right(n).value(&b).unwrap(), value.rotate_right(n as u32));
            assert_eq!(w.shift_right(n).value(&b).unwrap(), value >> n);
        }
        assert_eq!(b.num_constraints(), before);
    }

    #[test]
    fn packed_lc_folds_constants() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let w = assigned_word(&mut b, 0xdead_beef);
        assert_eq!(b.evaluate(&w.packed()).unwrap(), Fr::from(0xdead_beefu64));
        let c = Word::constant(0x6a09_e667);
        assert!(c.packed::<Fr>().terms.is_empty());
        assert_eq!(c.packed::<Fr>().constant, Fr::from(0x6a09_e667u64));
        assert_eq!(c.value(&b).unwrap(), 0x6a09_e667);
    }

    #[test]
    fn msb_first_construction_reverses_order() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let vars = b.allocate_vec(32, "v");
        let w = Word::from_variables_msb_first(&vars).unwrap();
        assert_eq!(w.bit(0), Bit::Var(vars[31]));
        assert_eq!(w.bit(31), Bit::Var(vars[0]));
        assert!(matches!(
            Word::from_variables(&vars[..8]),
            Err(Error::LengthMismatch { expected: 32, actual: 8 })
        ));
    }
}
