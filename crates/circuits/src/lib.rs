#![forbid(unsafe_code)]
//! # circuits
//!
//! Boolean gadgets and the SHA-256 compression circuit, built on the
//! [`board`] constraint system builder.
//!
//! Bits travel as [`Bit`]s and 32-bit words as [`Word`]s. Gadgets allocate on
//! construction and then run the two [`board::Gadget`] phases:
//!
//! ```no_run
//! use board::{Board, Gadget, Params};
//! use circuits::{DigestVariable, Sha256CompressionGadget};
//! use pasta_curves::Fp;
//!
//! # fn main() -> board::Result<()> {
//! let mut b = Board::<Fp>::new(Params::with_defaults());
//! let mut left = DigestVariable::digest(&mut b, "left");
//! let mut right = DigestVariable::digest(&mut b, "right");
//! let out = DigestVariable::digest(&mut b, "out");
//! let mut sha = Sha256CompressionGadget::new(&mut b, &left, &right, &out, "sha")?;
//! sha.generate_constraints(&mut b)?;
//! left.generate_witness(&mut b, &[false; 256])?;
//! right.generate_witness(&mut b, &[true; 256])?;
//! sha.generate_witness(&mut b)?;
//! assert!(b.is_satisfied()?);
//! # Ok(())
//! # }
//! ```

pub mod add;
pub mod bits;
pub mod boolean;
pub mod identity;
pub mod packing;
pub mod sha256;

pub use crate::add::ModularAddGadget;
pub use crate::bits::{Bit, Word, WORD_BITS};
pub use crate::boolean::{AndGadget, BitGadget, ChoiceGadget, MajorityGadget, WordGadget, Xor3Gadget, XorGadget};
pub use crate::identity::CubicIdentityGadget;
pub use crate::packing::{
    bits_from_bytes, bits_from_u32s, bytes_from_bits, u32s_from_bits, BitVectorVariable, BlockVariable,
    DigestVariable, BLOCK_BITS, DIGEST_BITS,
};
pub use crate::sha256::Sha256CompressionGadget;
