//! One SHA-256 round.

use board::{Board, Gadget, Result};
use ff::PrimeField;

use super::{big_sigma0, big_sigma1, SigmaGadget};
use crate::add::ModularAddGadget;
use crate::bits::Word;
use crate::boolean::{ChoiceGadget, MajorityGadget, WordGadget};

/// Maps working variables `[a, b, c, d, e, f, g, h]` to
/// `[a', a, b, c, e', e, f, g]`, where
///
/// ```text
/// T1 = h + Σ1(e) + CH(e, f, g) + K[t] + W[t]
/// T2 = Σ0(a) + MAJ(a, b, c)
/// a' = T1 + T2
/// e' = d + T1
/// ```
///
/// `a'` and `e'` are each a single wide addition, so T1 and T2 never get
/// variables of their own.
#[derive(Clone, Debug)]
pub struct RoundGadget {
    sigma1: SigmaGadget,
    ch: WordGadget<ChoiceGadget>,
    sigma0: SigmaGadget,
    maj: WordGadget<MajorityGadget>,
    new_a: ModularAddGadget,
    new_e: ModularAddGadget,
    output: [Word; 8],
}

impl RoundGadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>, state: &[Word; 8], k: u32, w: &Word, annotation: &str) -> Self {
        let [a, b, c, d, e, f, g, h] = state;
        let sigma1 = big_sigma1(board, e, &format!("{annotation}.S1"));
        let ch = WordGadget::choice(board, e, f, g, &format!("{annotation}.ch"));
        let sigma0 = big_sigma0(board, a, &format!("{annotation}.S0"));
        let maj = WordGadget::majority(board, a, b, c, &format!("{annotation}.maj"));

        let t1 = [h.clone(), sigma1.output().clone(), ch.output().clone(), Word::constant(k), w.clone()];
        let new_a = ModularAddGadget::new(
            board,
            t1.iter().cloned().chain([sigma0.output().clone(), maj.output().clone()]).collect(),
            &format!("{annotation}.a"),
        );
        let new_e = ModularAddGadget::new(
            board,
            core::iter::once(d.clone()).chain(t1).collect(),
            &format!("{annotation}.e"),
        );

        let output = [
            new_a.result().clone(),
            a.clone(),
            b.clone(),
            c.clone(),
            new_e.result().clone(),
            e.clone(),
            f.clone(),
            g.clone(),
        ];
        Self { sigma1, ch, sigma0, maj, new_a, new_e, output }
    }

    /// Working variables after this round.
    pub fn output(&self) -> &[Word; 8] { &self.output }
}

impl<F: PrimeField> Gadget<F> for RoundGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.sigma1.generate_constraints(board)?;
        self.ch.generate_constraints(board)?;
        self.sigma0.generate_constraints(board)?;
        self.maj.generate_constraints(board)?;
        self.new_a.generate_constraints(board)?;
        self.new_e.generate_constraints(board)
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        self.sigma1.generate_witness(board)?;
        self.ch.generate_witness(board)?;
        self.sigma0.generate_witness(board)?;
        self.maj.generate_witness(board)?;
        self.new_a.generate_witness(board)?;
        self.new_e.generate_witness(board)
    }
}
