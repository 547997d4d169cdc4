use thiserror::Error as ThisError;

use crate::gadget::GadgetState;
use crate::r1cs::Variable;

pub type Result<T> = core::result::Result<T, Error>;

/// Construction-time faults. None of these are recoverable: a board that
/// produced one of them describes a circuit that cannot be proved.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("unknown variable {0:?}")]
    UnknownVariable(Variable),
    #[error("variable {0:?} is already assigned")]
    DuplicateAssignment(Variable),
    #[error("variable {0:?} has no assigned value")]
    UnassignedVariable(Variable),
    #[error("bit length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("unsupported bit vector length {0} (expected 256 or 512)")]
    UnsupportedLength(usize),
    #[error("gadget `{gadget}` cannot {operation} in state {state:?}")]
    InvalidGadgetState {
        gadget: String,
        operation: &'static str,
        state: GadgetState,
    },
    #[error("primary input count {requested} is inconsistent with the board (allocated {allocated}, fixed {fixed:?})")]
    PrimaryInputCountMismatch {
        requested: usize,
        allocated: usize,
        fixed: Option<usize>,
    },
    #[error("boolean variable {0:?} assigned a non-boolean value")]
    NotBoolean(Variable),
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("deserialize error: {0}")]
    Deserialize(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("other: {0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self { Error::Other(e.to_string()) }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self { Error::Deserialize(e.to_string()) }
}
