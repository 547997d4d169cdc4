//! Fixed-length boolean vectors: 256-bit digests and 512-bit blocks.
//!
//! Bits are ordered most significant first within big-endian 32-bit words,
//! which is the order SHA-256 consumes its input in. Word `i` of a vector is
//! bits `32i..32i+32`.

use board::{Board, Error, GadgetState, Result, Variable};
use ff::PrimeField;
use tracing::debug;

use crate::bits::{Word, WORD_BITS};

pub const DIGEST_BITS: usize = 256;
pub const BLOCK_BITS: usize = 512;

#[derive(Clone, Debug)]
pub struct BitVectorVariable {
    bits: Vec<Variable>,
    name: String,
    constrained: bool,
    assigned: bool,
}

/// 256 boolean variables.
pub type DigestVariable = BitVectorVariable;
/// 512 boolean variables.
pub type BlockVariable = BitVectorVariable;

impl BitVectorVariable {
    pub fn digest<F: PrimeField>(board: &mut Board<F>, name: &str) -> Self {
        Self::allocate(board, DIGEST_BITS, name)
    }

    pub fn block<F: PrimeField>(board: &mut Board<F>, name: &str) -> Self {
        Self::allocate(board, BLOCK_BITS, name)
    }

    /// Only digest and block lengths are supported.
    pub fn with_length<F: PrimeField>(board: &mut Board<F>, len: usize, name: &str) -> Result<Self> {
        match len {
            DIGEST_BITS | BLOCK_BITS => Ok(Self::allocate(board, len, name)),
            other => Err(Error::UnsupportedLength(other)),
        }
    }

    fn allocate<F: PrimeField>(board: &mut Board<F>, len: usize, name: &str) -> Self {
        Self { bits: board.allocate_vec(len, name), name: name.to_string(), constrained: false, assigned: false }
    }

    /// A block made of two digests' variables, `left` first. No new
    /// variables are allocated.
    pub fn concat(left: &DigestVariable, right: &DigestVariable) -> Result<BlockVariable> {
        for part in [left, right] {
            if part.len() != DIGEST_BITS {
                return Err(Error::LengthMismatch { expected: DIGEST_BITS, actual: part.len() });
            }
        }
        let bits = left.bits.iter().chain(&right.bits).copied().collect();
        Ok(Self {
            bits,
            name: format!("{}||{}", left.name, right.name),
            constrained: false,
            assigned: false,
        })
    }

    #[inline]
    pub fn len(&self) -> usize { self.bits.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.bits.is_empty() }

    #[inline]
    pub fn variables(&self) -> &[Variable] { &self.bits }

    pub fn name(&self) -> &str { &self.name }

    /// Big-endian 32-bit words over the same variables.
    pub fn words(&self) -> Result<Vec<Word>> {
        self.bits.chunks(WORD_BITS).map(Word::from_variables_msb_first).collect()
    }

    /// Booleanity of every bit.
    pub fn generate_constraints<F: PrimeField>(&mut self, board: &mut Board<F>) -> Result<()> {
        if self.constrained {
            return Err(self.misuse("generate constraints", GadgetState::ConstraintsGenerated));
        }
        for (i, &v) in self.bits.iter().enumerate() {
            board.enforce_boolean(v, format!("{}[{i}] boolean", self.name))?;
        }
        self.constrained = true;
        debug!(vector = %self.name, bits = self.bits.len(), "bit vector constrained");
        Ok(())
    }

    pub fn generate_witness<F: PrimeField>(&mut self, board: &mut Board<F>, bits: &[bool]) -> Result<()> {
        if self.assigned {
            return Err(self.misuse("generate witness", GadgetState::WitnessGenerated));
        }
        if bits.len() != self.bits.len() {
            return Err(Error::LengthMismatch { expected: self.bits.len(), actual: bits.len() });
        }
        for (&v, &bit) in self.bits.iter().zip(bits) {
            board.assign_bit(v, bit)?;
        }
        self.assigned = true;
        Ok(())
    }

    pub fn get_bits<F: PrimeField>(&self, board: &Board<F>) -> Result<Vec<bool>> {
        self.bits.iter().map(|&v| board.bit_value(v)).collect()
    }

    pub fn get_bytes<F: PrimeField>(&self, board: &Board<F>) -> Result<Vec<u8>> {
        Ok(bytes_from_bits(&self.get_bits(board)?))
    }

    fn misuse(&self, operation: &'static str, state: GadgetState) -> Error {
        Error::InvalidGadgetState { gadget: self.name.clone(), operation, state }
    }
}

/// Each word contributes its 32 bits, most significant first.
pub fn bits_from_u32s(words: &[u32]) -> Vec<bool> {
    words.iter().flat_map(|&w| (0..WORD_BITS).rev().map(move |i| (w >> i) & 1 == 1)).collect()
}

pub fn bits_from_bytes(bytes: &[u8]) -> Vec<bool> {
    bytes.iter().flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1 == 1)).collect()
}

/// Inverse of [`bits_from_bytes`]; a trailing partial byte is zero-padded.
pub fn bytes_from_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| chunk.iter().enumerate().fold(0u8, |acc, (i, &b)| acc | (u8::from(b) << (7 - i))))
        .collect()
}

/// Inverse of [`bits_from_u32s`]; a trailing partial word is zero-padded.
pub fn u32s_from_bits(bits: &[bool]) -> Vec<u32> {
    bits.chunks(WORD_BITS)
        .map(|chunk| chunk.iter().enumerate().fold(0u32, |acc, (i, &b)| acc | (u32::from(b) << (31 - i))))
        .collect()
}
