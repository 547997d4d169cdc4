use board::{Board, Error, Gadget, GadgetState, Result};
use ff::PrimeField;
use tracing::debug;

use super::{MessageScheduleGadget, RoundGadget, IV, K};
use crate::add::ModularAddGadget;
use crate::bits::{Word, WORD_BITS};
use crate::packing::{BitVectorVariable, BlockVariable, DigestVariable, BLOCK_BITS, DIGEST_BITS};

/// SHA-256 compression of one 512-bit block from the initial hash value,
/// written into a caller-owned 256-bit digest.
///
/// Constraint generation boolean-constrains the input block and the output
/// digest. Witness generation requires every input bit to be assigned.
#[derive(Clone, Debug)]
pub struct Sha256CompressionGadget {
    input: BlockVariable,
    output: DigestVariable,
    schedule: MessageScheduleGadget,
    rounds: Vec<RoundGadget>,
    finals: Vec<ModularAddGadget>,
    annotation: String,
    state: GadgetState,
}

impl Sha256CompressionGadget {
    /// Two-to-one hash: the block is `left || right`.
    pub fn new<F: PrimeField>(
        board: &mut Board<F>,
        left: &DigestVariable,
        right: &DigestVariable,
        output: &DigestVariable,
        annotation: &str,
    ) -> Result<Self> {
        let block = BitVectorVariable::concat(left, right)?;
        Self::from_block(board, &block, output, annotation)
    }

    pub fn from_block<F: PrimeField>(
        board: &mut Board<F>,
        block: &BlockVariable,
        output: &DigestVariable,
        annotation: &str,
    ) -> Result<Self> {
        if block.len() != BLOCK_BITS {
            return Err(Error::LengthMismatch { expected: BLOCK_BITS, actual: block.len() });
        }
        if output.len() != DIGEST_BITS {
            return Err(Error::LengthMismatch { expected: DIGEST_BITS, actual: output.len() });
        }

        let words: [Word; 16] = block
            .words()?
            .try_into()
            .map_err(|w: Vec<Word>| Error::LengthMismatch { expected: 16, actual: w.len() })?;
        let schedule = MessageScheduleGadget::new(board, words, &format!("{annotation}.schedule"));

        let mut state = IV.map(Word::constant);
        let mut rounds = Vec::with_capacity(64);
        for t in 0..64 {
            let round = RoundGadget::new(board, &state, K[t], &schedule.words()[t], &format!("{annotation}.round[{t}]"));
            state = round.output().clone();
            rounds.push(round);
        }

        let mut finals = Vec::with_capacity(8);
        for (i, chunk) in output.variables().chunks(WORD_BITS).enumerate() {
            let lsb_first: Vec<_> = chunk.iter().rev().copied().collect();
            finals.push(ModularAddGadget::with_result(
                board,
                vec![Word::constant(IV[i]), state[i].clone()],
                lsb_first,
                &format!("{annotation}.h[{i}]"),
            )?);
        }

        Ok(Self {
            input: block.clone(),
            output: output.clone(),
            schedule,
            rounds,
            finals,
            annotation: annotation.to_string(),
            state: GadgetState::default(),
        })
    }

    pub fn output(&self) -> &DigestVariable { &self.output }

    pub fn input(&self) -> &BlockVariable { &self.input }
}

impl<F: PrimeField> Gadget<F> for Sha256CompressionGadget {
    fn generate_constraints(&mut self, board: &mut Board<F>) -> Result<()> {
        self.state.begin_constraints(&self.annotation)?;
        let before = board.num_constraints();
        for (i, &v) in self.input.variables().iter().enumerate() {
            board.enforce_boolean(v, format!("{}.input[{i}] boolean", self.annotation))?;
        }
        self.schedule.generate_constraints(board)?;
        for round in &mut self.rounds {
            round.generate_constraints(board)?;
        }
        for add in &mut self.finals {
            add.generate_constraints(board)?;
        }
        debug!(gadget = %self.annotation, constraints = board.num_constraints() - before, "sha256 compression constrained");
        Ok(())
    }

    fn generate_witness(&mut self, board: &mut Board<F>) -> Result<()> {
        // Inputs are checked before the state advances.
        if self.state == GadgetState::ConstraintsGenerated {
            for &v in self.input.variables() {
                board.value(v)?;
            }
        }
        self.state.begin_witness(&self.annotation)?;
        self.schedule.generate_witness(board)?;
        for round in &mut self.rounds {
            round.generate_witness(board)?;
        }
        for add in &mut self.finals {
            add.generate_witness(board)?;
        }
        debug!(gadget = %self.annotation, "sha256 compression witness generated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::bits_from_u32s;
    use crate::sha256::native;
    use board::Params;

    type Fr = pasta_curves::Fp;

    #[test]
    fn unassigned_input_is_reported() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let block = BlockVariable::block(&mut b, "block");
        let out = DigestVariable::digest(&mut b, "out");
        let mut g = Sha256CompressionGadget::from_block(&mut b, &block, &out, "sha").unwrap();
        g.generate_constraints(&mut b).unwrap();
        assert!(matches!(g.generate_witness(&mut b), Err(Error::UnassignedVariable(_))));
    }

    #[test]
    fn witness_retry_after_assigning_input() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let mut block = BlockVariable::block(&mut b, "block");
        let out = DigestVariable::digest(&mut b, "out");
        let mut g = Sha256CompressionGadget::from_block(&mut b, &block, &out, "sha").unwrap();
        g.generate_constraints(&mut b).unwrap();
        assert!(matches!(g.generate_witness(&mut b), Err(Error::UnassignedVariable(_))));

        let words = [0x6162_6380u32, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x18];
        block.generate_witness(&mut b, &bits_from_u32s(&words)).unwrap();
        g.generate_witness(&mut b).unwrap();
        assert!(b.is_satisfied().unwrap());
        assert_eq!(g.output().get_bits(&b).unwrap(), bits_from_u32s(&native::compress(IV, words)));
    }

    #[test]
    fn rejects_wrong_lengths() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let digest = DigestVariable::digest(&mut b, "d");
        let block = BlockVariable::block(&mut b, "b");
        assert!(matches!(
            Sha256CompressionGadget::from_block(&mut b, &digest, &digest, "sha"),
            Err(Error::LengthMismatch { expected: 512, actual: 256 })
        ));
        assert!(matches!(
            Sha256CompressionGadget::from_block(&mut b, &block, &block, "sha"),
            Err(Error::LengthMismatch { expected: 256, actual: 512 })
        ));
    }

    #[test]
    fn block_compression_matches_native() {
        let mut b = Board::<Fr>::new(Params::with_defaults());
        let mut block = BlockVariable::block(&mut b, "block");
        let out = DigestVariable::digest(&mut b, "out");
        let mut g = Sha256CompressionGadget::from_block(&mut b, &block, &out, "sha").unwrap();
        g.generate_constraints(&mut b).unwrap();
        assert!(matches!(g.generate_constraints(&mut b), Err(Error::InvalidGadgetState { .. })));

        let words: [u32; 16] = core::array::from_fn(|i| 0x0101_0101u32.wrapping_mul(i as u32 + 1));
        block.generate_witness(&mut b, &bits_from_u32s(&words)).unwrap();
        g.generate_witness(&mut b).unwrap();
        assert!(b.is_satisfied().unwrap());
        assert_eq!(g.output().get_bits(&b).unwrap(), bits_from_u32s(&native::compress(IV, words)));
    }
}
