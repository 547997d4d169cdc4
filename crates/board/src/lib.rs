#![forbid(unsafe_code)]
//! # board
//!
//! Rank-1 constraint system builder for gadget-composed circuits.
//!
//! A [`Board`] owns the wires, constraints and witness of exactly one circuit.
//! Gadgets implement [`Gadget`]: they allocate their variables on construction,
//! emit constraints independently of any values, then compute the values they
//! own once their inputs are assigned. The finished [`ConstraintSystem`] and
//! [`Assignment`] are handed to a [`ProvingBackend`].
//!
//! ```
//! use board::{Board, Params, LinearCombination};
//! use pasta_curves::Fp;
//!
//! let mut b = Board::<Fp>::new(Params::with_defaults());
//! let x = b.allocate("x");
//! let y = b.allocate("y");
//! b.add_constraint(x.into(), x.into(), y.into(), "x*x=y").unwrap();
//! b.assign(x, Fp::from(4u64)).unwrap();
//! b.assign(y, Fp::from(16u64)).unwrap();
//! assert!(b.is_satisfied().unwrap());
//! # let _ = LinearCombination::<Fp>::zero();
//! ```

pub mod backend;
pub mod board;
pub mod config;
pub mod error;
pub mod gadget;
pub mod r1cs;

pub use crate::backend::{KeyPair, ProvingBackend, TranscriptBackend};
pub use crate::board::Board;
pub use crate::config::{BoardConfig, Params};
pub use crate::error::{Error, Result};
pub use crate::gadget::{Gadget, GadgetState};
pub use crate::r1cs::{Assignment, Constraint, ConstraintSystem, LinearCombination, LinearTerm, Variable};
