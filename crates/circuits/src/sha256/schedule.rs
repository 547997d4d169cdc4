//! Message expansion: 16 block words to 64 schedule words.

use board::{Board, Gadget, Result};
use ff::PrimeField;

use super::{small_sigma0, small_sigma1, SigmaGadget};
use crate::add::ModularAddGadget;
use crate::bits::Word;

#[derive(Clone, Debug)]
struct ScheduleStep {
    s0: SigmaGadget,
    s1: SigmaGadget,
    add: ModularAddGadget,
}

/// W[t] = σ1(W[t-2]) + W[t-7] + σ0(W[t-15]) + W[t-16] for t in 16..64.
#[derive(Clone, Debug)]
pub struct MessageScheduleGadget {
    words: Vec<Word>,
    steps: Vec<ScheduleStep>,
}

impl MessageScheduleGadget {
    pub fn new<F: PrimeField>(board: &mut Board<F>, block: [Word; 16], annotation: &str) -> Self {
        let mut words = Vec::with_capacity(64);
        words.extend(block);
        let mut steps = Vec::with_capacity(48);
        for t in 16..64 {
            let s0 = small_sigma0(board, &words[t - 15], &format!("{annotation}.s0[{t}]"));
            let s1 = small_sigma1(board, &words[t - 2], &format!("{annotation}.s1[{t}]"));
            let operands = vec![words[t - 16].clone(), s0.output().clone(), words[t - 7].clone(), s1.output().clone()];
            let add = ModularAddGadget::new(board, operands, &format!("{annotation}.w[{t}]"));
            words.push(add.result().clone());
            steps.push(ScheduleStep { s0, s1, add });
        }
        Self { words, steps }
    }

    /// All 64 schedule words; the first 16 are the block itself.
    pub fn words(&self) -> &[Word] { &self.words }
}

impl<F: PrimeField> Gadget<F> for MessageScheduleGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        for step in &mut self.steps {
            step.s0.generate_constraints(board)?;
            step.s1.generate_constraints(board)?;
            step.add.generate_constraints(board)?;
        }
        Ok(())
    }

    /// Word t depends on words t-2 and t-7, so steps run strictly in order.
    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        for step in &mut self.steps {
            step.s0.generate_witness(board)?;
            step.s1.generate_witness(board)?;
            step.add.generate_witness(board)?;
        }
        Ok(())
    }
}
