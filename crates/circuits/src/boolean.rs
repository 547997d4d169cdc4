//! Boolean gadget primitives over the board.
//!
//! Every primitive assumes its input bits are already boolean-constrained
//! upstream and does not re-check them. Each output is forced to 0/1 by its
//! defining identity whenever the inputs are boolean, so no separate
//! booleanity constraint is emitted for it.
//!
//! | gadget      | identity                          | constraints |
//! |-------------|-----------------------------------|-------------|
//! | AND         | `a*b = c`                         | 1 |
//! | XOR         | `2a*b = a + b - c`                | 1 |
//! | XOR3        | two chained XORs                  | 2 (1 if `c` is the zero bit or `a`, `b` are constant) |
//! | CH          | `x*(y - z) = out - z`             | 1 |
//! | MAJ         | `a*b = t`, `c*(a + b - 2t) = out - t` | 2 (1 if `a`, `b` are constant) |
//!
//! A gadget whose inputs are all constant bits folds to a constant output:
//! it allocates nothing and emits no constraint.

use board::{Board, Gadget, GadgetState, LinearCombination, Result, Variable};
use ff::PrimeField;
use tracing::debug;

use crate::bits::{Bit, Word, WORD_BITS};

/// The output wire of a single-bit gadget.
pub trait BitGadget {
    fn output(&self) -> Bit;
}

fn xor_witness<F: PrimeField>(a: F, b: F) -> F { a + b - (a * b).double() }

fn enforce_xor<F: PrimeField>(board: &mut Board<F>, a: Bit, b: Bit, out: Variable, annotation: String) -> Result<()> {
    // (a + a) * b = a + b - out
    board.add_constraint(
        a.lc::<F>() * F::from(2u64),
        b.lc(),
        a.lc::<F>() + b.lc() - out,
        annotation,
    )
}

/// `Some(Bit::Const(f(..)))` when every input is a constant bit.
fn fold<const N: usize>(inputs: [Bit; N], f: impl FnOnce([bool; N]) -> bool) -> Option<Bit> {
    let mut values = [false; N];
    for (slot, bit) in values.iter_mut().zip(inputs) {
        *slot = bit.constant_value()?;
    }
    Some(Bit::Const(f(values)))
}

fn output_wire<F: PrimeField>(board: &mut Board<F>, folded: Option<Bit>, annotation: &str) -> Bit {
    folded.unwrap_or_else(|| Bit::Var(board.allocate(format!("{annotation}.out"))))
}

#[derive(Clone, Debug)]
pub struct AndGadget {
    a: Bit,
    b: Bit,
    out: Bit,
    annotation: String,
    state: GadgetState,
}

impl AndGadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>, a: Bit, b: Bit, annotation: &str) -> Self {
        let out = output_wire(board, fold([a, b], |[a, b]| a & b), annotation);
        Self { a, b, out, annotation: annotation.to_string(), state: GadgetState::default() }
    }
}

impl<F: PrimeField> Gadget<F> for AndGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        let Bit::Var(out) = self.out else { return Ok(()) };
        board.add_constraint(self.a.lc(), self.b.lc(), out.into(), format!("{} a*b=out", self.annotation))
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        let Bit::Var(out) = self.out else { return self.state.begin_witness(&self.annotation) };
        let value = self.a.field_value(board)? * self.b.field_value::<F>(board)?;
        self.state.begin_witness(&self.annotation)?;
        board.assign(out, value)
    }
}

impl BitGadget for AndGadget {
    fn output(&self) -> Bit { self.out }
}

#[derive(Clone, Debug)]
pub struct XorGadget {
    a: Bit,
    b: Bit,
    out: Bit,
    annotation: String,
    state: GadgetState,
}

impl XorGadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>, a: Bit, b: Bit, annotation: &str) -> Self {
        let out = output_wire(board, fold([a, b], |[a, b]| a ^ b), annotation);
        Self { a, b, out, annotation: annotation.to_string(), state: GadgetState::default() }
    }
}

impl<F: PrimeField> Gadget<F> for XorGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        let Bit::Var(out) = self.out else { return Ok(()) };
        enforce_xor(board, self.a, self.b, out, format!("{} xor", self.annotation))
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        let Bit::Var(out) = self.out else { return self.state.begin_witness(&self.annotation) };
        let value = xor_witness(self.a.field_value(board)?, self.b.field_value(board)?);
        self.state.begin_witness(&self.annotation)?;
        board.assign(out, value)
    }
}

impl BitGadget for XorGadget {
    fn output(&self) -> Bit { self.out }
}

/// a XOR b XOR c.
///
/// `tmp` carries a XOR b into the second XOR. It is `None` when `c` is the
/// constant zero bit (the fill of a logical shift) and a single XOR writes
/// the output, and a constant when `a` and `b` are both constant.
#[derive(Clone, Debug)]
pub struct Xor3Gadget {
    a: Bit,
    b: Bit,
    c: Bit,
    tmp: Option<Bit>,
    out: Bit,
    annotation: String,
    state: GadgetState,
}

impl Xor3Gadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>, a: Bit, b: Bit, c: Bit, annotation: &str) -> Self {
        let out = output_wire(board, fold([a, b, c], |[a, b, c]| a ^ b ^ c), annotation);
        let tmp = if out.variable().is_none() || c.is_const_zero() {
            None
        } else {
            Some(fold([a, b], |[a, b]| a ^ b).unwrap_or_else(|| Bit::Var(board.allocate(format!("{annotation}.tmp")))))
        };
        Self { a, b, c, tmp, out, annotation: annotation.to_string(), state: GadgetState::default() }
    }
}

impl<F: PrimeField> Gadget<F> for Xor3Gadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        let Bit::Var(out) = self.out else { return Ok(()) };
        if let Some(Bit::Var(tmp)) = self.tmp {
            enforce_xor(board, self.a, self.b, tmp, format!("{} xor(a,b)", self.annotation))?;
        }
        match self.tmp {
            Some(tmp) => enforce_xor(board, tmp, self.c, out, format!("{} xor(tmp,c)", self.annotation)),
            None => enforce_xor(board, self.a, self.b, out, format!("{} xor(a,b)", self.annotation)),
        }
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        let Bit::Var(out) = self.out else { return self.state.begin_witness(&self.annotation) };
        let ab = xor_witness(self.a.field_value(board)?, self.b.field_value(board)?);
        let value = match self.tmp {
            Some(_) => xor_witness(ab, self.c.field_value(board)?),
            None => ab,
        };
        self.state.begin_witness(&self.annotation)?;
        if let Some(Bit::Var(tmp)) = self.tmp {
            board.assign(tmp, ab)?;
        }
        board.assign(out, value)
    }
}

impl BitGadget for Xor3Gadget {
    fn output(&self) -> Bit { self.out }
}

/// CH(x, y, z) = x ? y : z
#[derive(Clone, Debug)]
pub struct ChoiceGadget {
    x: Bit,
    y: Bit,
    z: Bit,
    out: Bit,
    annotation: String,
    state: GadgetState,
}

impl ChoiceGadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>, x: Bit, y: Bit, z: Bit, annotation: &str) -> Self {
        let out = output_wire(board, fold([x, y, z], |[x, y, z]| if x { y } else { z }), annotation);
        Self { x, y, z, out, annotation: annotation.to_string(), state: GadgetState::default() }
    }
}

impl<F: PrimeField> Gadget<F> for ChoiceGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        let Bit::Var(out) = self.out else { return Ok(()) };
        board.add_constraint(
            self.x.lc(),
            self.y.lc::<F>() - self.z.lc(),
            LinearCombination::from(out) - self.z.lc(),
            format!("{} ch", self.annotation),
        )
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        let Bit::Var(out) = self.out else { return self.state.begin_witness(&self.annotation) };
        let (x, y, z): (F, F, F) = (self.x.field_value(board)?, self.y.field_value(board)?, self.z.field_value(board)?);
        self.state.begin_witness(&self.annotation)?;
        board.assign(out, z + x * (y - z))
    }
}

impl BitGadget for ChoiceGadget {
    fn output(&self) -> Bit { self.out }
}

/// MAJ(a, b, c) = a*b + c*(a XOR b)
#[derive(Clone, Debug)]
pub struct MajorityGadget {
    a: Bit,
    b: Bit,
    c: Bit,
    and_ab: Bit,
    out: Bit,
    annotation: String,
    state: GadgetState,
}

impl MajorityGadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>, a: Bit, b: Bit, c: Bit, annotation: &str) -> Self {
        let out = output_wire(board, fold([a, b, c], |[a, b, c]| (a & b) | (c & (a ^ b))), annotation);
        let and_ab = match out {
            Bit::Const(_) => Bit::Const(false),
            Bit::Var(_) => {
                fold([a, b], |[a, b]| a & b).unwrap_or_else(|| Bit::Var(board.allocate(format!("{annotation}.ab"))))
            }
        };
        Self { a, b, c, and_ab, out, annotation: annotation.to_string(), state: GadgetState::default() }
    }
}

impl<F: PrimeField> Gadget<F> for MajorityGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        let Bit::Var(out) = self.out else { return Ok(()) };
        if let Bit::Var(t) = self.and_ab {
            board.add_constraint(self.a.lc(), self.b.lc(), t.into(), format!("{} a*b", self.annotation))?;
        }
        // a XOR b = a + b - 2ab
        let a_xor_b = self.a.lc::<F>() + self.b.lc() - self.and_ab.lc::<F>() * F::from(2u64);
        board.add_constraint(
            self.c.lc(),
            a_xor_b,
            LinearCombination::from(out) - self.and_ab.lc(),
            format!("{} maj", self.annotation),
        )
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        let Bit::Var(out) = self.out else { return self.state.begin_witness(&self.annotation) };
        let (a, b, c): (F, F, F) = (self.a.field_value(board)?, self.b.field_value(board)?, self.c.field_value(board)?);
        let ab = a * b;
        self.state.begin_witness(&self.annotation)?;
        if let Bit::Var(t) = self.and_ab {
            board.assign(t, ab)?;
        }
        board.assign(out, ab + c * (a + b - ab.double()))
    }
}

impl BitGadget for MajorityGadget {
    fn output(&self) -> Bit { self.out }
}

/// 32 independent bit gadgets applied position-wise to words.
#[derive(Clone, Debug)]
pub struct WordGadget<G> {
    bits: Vec<G>,
    output: Word,
    annotation: String,
    state: GadgetState,
}

impl<G: BitGadget> WordGadget<G> {
    fn build<F: PrimeField>(
        board: &mut Board<F>,
        annotation: &str,
        mut make: impl FnMut(&mut Board<F>, usize, &str) -> G,
    ) -> Self {
        let bits: Vec<G> = (0..WORD_BITS).map(|i| make(&mut *board, i, &format!("{annotation}[{i}]"))).collect();
        let output = Word::from_bits(core::array::from_fn(|i| bits[i].output()));
        Self { bits, output, annotation: annotation.to_string(), state: GadgetState::default() }
    }

    #[inline]
    pub fn output(&self) -> &Word { &self.output }
}

impl WordGadget<Xor3Gadget> {
    pub fn xor3<F: PrimeField>(board: &mut Board<F>, a: &Word, b: &Word, c: &Word, annotation: &str) -> Self {
        Self::build(board, annotation, |board, i, ann| Xor3Gadget::new(board, a.bit(i), b.bit(i), c.bit(i), ann))
    }
}

impl WordGadget<XorGadget> {
    pub fn xor<F: PrimeField>(board: &mut Board<F>, a: &Word, b: &Word, annotation: &str) -> Self {
        Self::build(board, annotation, |board, i, ann| XorGadget::new(board, a.bit(i), b.bit(i), ann))
    }
}

impl WordGadget<AndGadget> {
    pub fn and<F: PrimeField>(board: &mut Board<F>, a: &Word, b: &Word, annotation: &str) -> Self {
        Self::build(board, annotation, |board, i, ann| AndGadget::new(board, a.bit(i), b.bit(i), ann))
    }
}

impl WordGadget<ChoiceGadget> {
    pub fn choice<F: PrimeField>(board: &mut Board<F>, x: &Word, y: &Word, z: &Word, annotation: &str) -> Self {
        Self::build(board, annotation, |board, i, ann| ChoiceGadget::new(board, x.bit(i), y.bit(i), z.bit(i), ann))
    }
}

impl WordGadget<MajorityGadget> {
    pub fn majority<F: PrimeField>(board: &mut Board<F>, a: &Word, b: &Word, c: &Word, annotation: &str) -> Self {
        Self::build(board, annotation, |board, i, ann| MajorityGadget::new(board, a.bit(i), b.bit(i), c.bit(i), ann))
    }
}

impl<F: PrimeField, G: Gadget<F> + BitGadget> Gadget<F> for WordGadget<G> {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        let before = board.num_constraints();
        for g in self.bits.iter_mut() {
            g.generate_constraints(board)?;
        }
        debug!(gadget = %self.annotation, constraints = board.num_constraints() - before, "word gadget constrained");
        Ok(())
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_witness(&self.annotation)?;
        self.bits.iter_mut().try_for_each(|g| g.generate_witness(board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::{Error, Params};

    type Fr = pasta_curves::Fp;

    fn board() -> Board<Fr> { Board::new(Params::with_defaults()) }

    fn input_bit(board: &mut Board<Fr>, value: bool, name: &str) -> Bit {
        let v = board.allocate(name);
        board.enforce_boolean(v, name).unwrap();
        board.assign_bit(v, value).unwrap();
        Bit::Var(v)
    }

    /// Build, constrain and evaluate a 3-input bit gadget over all inputs.
    fn truth_table<G: Gadget<Fr> + BitGadget>(
        make: impl Fn(&mut Board<Fr>, Bit, Bit, Bit) -> G,
        expected: impl Fn(bool, bool, bool) -> bool,
        constraints: usize,
    ) {
        for mask in 0u8..8 {
            let (a, b, c) = (mask & 1 == 1, mask & 2 == 2, mask & 4 == 4);
            let mut bd = board();
            let (x, y, z) = (input_bit(&mut bd, a, "a"), input_bit(&mut bd, b, "b"), input_bit(&mut bd, c, "c"));
            let before = bd.num_constraints();
            let mut g = make(&mut bd, x, y, z);
            g.generate_constraints(&mut bd).unwrap();
            assert_eq!(bd.num_constraints() - before, constraints);
            g.generate_witness(&mut bd).unwrap();
            assert_eq!(g.output().value(&bd).unwrap(), expected(a, b, c), "inputs {a} {b} {c}");
            assert!(bd.is_satisfied().unwrap());
        }
    }

    #[test]
    fn and_xor_truth_tables() {
        truth_table(|bd, a, b, _| AndGadget::new(bd, a, b, "and"), |a, b, _| a & b, 1);
        truth_table(|bd, a, b, _| XorGadget::new(bd, a, b, "xor"), |a, b, _| a ^ b, 1);
    }

    #[test]
    fn xor3_truth_table_and_zero_fill() {
        truth_table(|bd, a, b, c| Xor3Gadget::new(bd, a, b, c, "xor3"), |a, b, c| a ^ b ^ c, 2);
        truth_table(|bd, a, b, _| Xor3Gadget::new(bd, a, b, Bit::Const(false), "xor3z"), |a, b, _| a ^ b, 1);
    }

    #[test]
    fn choice_and_majority_truth_tables() {
        truth_table(|bd, x, y, z| ChoiceGadget::new(bd, x, y, z, "ch"), |x, y, z| if x { y } else { z }, 1);
        truth_table(
            |bd, a, b, c| MajorityGadget::new(bd, a, b, c, "maj"),
            |a, b, c| (a as u8 + b as u8 + c as u8) >= 2,
            2,
        );
    }

    #[test]
    fn constant_inputs_fold_without_constraints() {
        for mask in 0u8..8 {
            let (a, b, c) = (Bit::Const(mask & 1 == 1), Bit::Const(mask & 2 == 2), Bit::Const(mask & 4 == 4));
            let mut bd = board();
            let (x, y, z) = (mask & 1 == 1, mask & 2 == 2, mask & 4 == 4);
            let and = AndGadget::new(&mut bd, a, b, "and");
            let xor3 = Xor3Gadget::new(&mut bd, a, b, c, "xor3");
            let ch = ChoiceGadget::new(&mut bd, a, b, c, "ch");
            let maj = MajorityGadget::new(&mut bd, a, b, c, "maj");
            let gadgets: Vec<(Bit, bool, Box<dyn Gadget<Fr>>)> = vec![
                (and.output(), x & y, Box::new(and) as Box<dyn Gadget<Fr>>),
                (xor3.output(), x ^ y ^ z, Box::new(xor3) as Box<dyn Gadget<Fr>>),
                (ch.output(), if x { y } else { z }, Box::new(ch) as Box<dyn Gadget<Fr>>),
                (maj.output(), (x as u8 + y as u8 + z as u8) >= 2, Box::new(maj) as Box<dyn Gadget<Fr>>),
            ];
            for (out, expected, mut g) in gadgets {
                assert_eq!(out, Bit::Const(expected));
                g.generate_constraints(&mut bd).unwrap();
                g.generate_witness(&mut bd).unwrap();
            }
            assert_eq!(bd.num_variables(), 0);
            assert_eq!(bd.num_constraints(), 0);
        }
    }

    #[test]
    fn partially_constant_inputs_save_a_constraint() {
        truth_table(
            |bd, _, _, c| Xor3Gadget::new(bd, Bit::Const(true), Bit::Const(false), c, "xor3"),
            |_, _, c| !c,
            1,
        );
        truth_table(
            |bd, _, _, c| MajorityGadget::new(bd, Bit::Const(true), Bit::Const(false), c, "maj"),
            |_, _, c| c,
            1,
        );
    }

    #[test]
    fn forged_xor_output_is_unsatisfiable() {
        let mut bd = board();
        let a = input_bit(&mut bd, true, "a");
        let b = input_bit(&mut bd, true, "b");
        let mut g = XorGadget::new(&mut bd, a, b, "xor");
        g.generate_constraints(&mut bd).unwrap();
        let out = g.output().variable().unwrap();
        bd.assign_bit(out, true).unwrap();
        assert!(!bd.is_satisfied().unwrap());
    }

    #[test]
    fn witness_before_constraints_is_rejected() {
        let mut bd = board();
        let a = input_bit(&mut bd, true, "a");
        let mut g = AndGadget::new(&mut bd, a, a, "and");
        let err = Gadget::<Fr>::generate_witness(&mut g, &mut bd).unwrap_err();
        assert!(matches!(err, Error::InvalidGadgetState { .. }));
    }

    #[test]
    fn word_gadgets_match_native_bitwise_ops() {
        let mut bd = board();
        let (x, y, z) = (0x510e_527fu32, 0x9b05_688c, 0x1f83_d9ab);
        let words: Vec<Word> = [x, y, z]
            .iter()
            .map(|&v| {
                let w = Word::allocate(&mut bd, "in");
                w.enforce_boolean(&mut bd, "in").unwrap();
                w.assign(&mut bd, v).unwrap();
                w
            })
            .collect();

        let mut ch = WordGadget::choice(&mut bd, &words[0], &words[1], &words[2], "ch");
        let mut maj = WordGadget::majority(&mut bd, &words[0], &words[1], &words[2], "maj");
        let mut x3 = WordGadget::xor3(&mut bd, &words[0], &words[1], &words[2], "xor3");
        let mut and = WordGadget::and(&mut bd, &words[0], &words[1], "and");
        let mut xor = WordGadget::xor(&mut bd, &words[1], &words[2], "xor");
        for g in [&mut ch as &mut dyn Gadget<Fr>, &mut maj, &mut x3, &mut and, &mut xor] {
            g.generate_constraints(&mut bd).unwrap();
            g.generate_witness(&mut bd).unwrap();
        }
        assert_eq!(ch.output().value(&bd).unwrap(), (x & y) ^ (!x & z));
        assert_eq!(maj.output().value(&bd).unwrap(), (x & y) ^ (x & z) ^ (y & z));
        assert_eq!(x3.output().value(&bd).unwrap(), x ^ y ^ z);
        assert_eq!(and.output().value(&bd).unwrap(), x & y);
        assert_eq!(xor.output().value(&bd).unwrap(), y ^ z);
        assert!(bd.is_satisfied().unwrap());
    }

    #[test]
    fn constant_word_folds_to_constant_word() {
        let mut bd = board();
        let a = Word::constant(0x6a09_e667);
        let mut sigma = WordGadget::xor3(&mut bd, &a.rotate_right(2), &a.rotate_right(13), &a.rotate_right(22), "S0");
        Gadget::<Fr>::generate_constraints(&mut sigma, &mut bd).unwrap();
        assert_eq!(bd.num_constraints(), 0);
        assert_eq!(*sigma.output(), Word::constant(0x6a09_e667u32.rotate_right(2) ^ 0x6a09_e667u32.rotate_right(13) ^ 0x6a09_e667u32.rotate_right(22)));
    }
}
