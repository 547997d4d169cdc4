//! Proving backend interface and a development backend.
//!
//! `TranscriptBackend` binds the constraint system with a BLAKE3 structure
//! digest and checks proofs by re-evaluating every constraint. It carries the
//! auxiliary assignment in the clear and is therefore NOT zero-knowledge; a
//! pairing-based backend implements the same trait and replaces it.

use anyhow::{anyhow, Result};
use blake3::Hasher as Blake3Hasher;
use ff::PrimeField;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::r1cs::ConstraintSystem;

/// Keys and proofs produced by a backend for one constraint system.
pub trait ProvingBackend<F: PrimeField> {
    type ProvingKey;
    type VerificationKey;
    type Proof;

    /// Depends only on the circuit shape.
    fn generate_keys(&self, cs: &ConstraintSystem<F>) -> Result<KeyPair<Self::ProvingKey, Self::VerificationKey>>;

    fn prove(&self, pk: &Self::ProvingKey, primary: &[F], auxiliary: &[F]) -> Result<Self::Proof>;

    /// `Ok(false)` for an invalid witness or tampered proof; `Err` only for
    /// malformed keys.
    fn verify(&self, vk: &Self::VerificationKey, primary: &[F], proof: &Self::Proof) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct KeyPair<PK, VK> {
    pub pk: PK,
    pub vk: VK,
}

/// Versioned proof format for transcript proofs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofFormatVersion(pub u8);

pub const PROOF_FORMAT_VERSION: ProofFormatVersion = ProofFormatVersion(1);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "F: PrimeField", deserialize = "F: PrimeField"))]
pub struct TranscriptProvingKey<F: PrimeField> {
    pub domain: Vec<u8>,
    pub r1cs_digest: [u8; 32],
    pub system: ConstraintSystem<F>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptVerificationKey {
    pub domain: Vec<u8>,
    /// Digest of constraints (structure-only)
    pub r1cs_digest: [u8; 32],
    /// Serialized constraints (no witness)
    pub constraints_bytes: Vec<u8>,
    pub primary_input_size: usize,
}

/// Transcript proof carrying the auxiliary assignment (not ZK).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: PrimeField", deserialize = "F: PrimeField"))]
pub struct TranscriptProof<F: PrimeField> {
    pub version: ProofFormatVersion,
    pub r1cs_digest: [u8; 32],
    #[serde(with = "crate::r1cs::serde_vec_field_bytes")]
    pub auxiliary: Vec<F>,
    /// BLAKE3 over digest, primary and auxiliary input
    pub binding: [u8; 32],
}

macro_rules! bincode_bytes {
    ($($ty:ty => [$($g:tt)*]),* $(,)?) => {$(
        impl<$($g)*> $ty {
            pub fn to_bytes(&self) -> Result<Vec<u8>> { Ok(bincode::serialize(self)?) }
            pub fn from_bytes(bytes: &[u8]) -> Result<Self> { Ok(bincode::deserialize(bytes)?) }
        }
    )*};
}

bincode_bytes! {
    TranscriptProvingKey<F> => [F: PrimeField],
    TranscriptVerificationKey => [],
    TranscriptProof<F> => [F: PrimeField],
}

/// Development backend. See the module docs for its (lack of) hiding.
#[derive(Debug, Clone)]
pub struct TranscriptBackend {
    domain: Vec<u8>,
}

impl TranscriptBackend {
    pub fn new(domain: impl Into<Vec<u8>>) -> Self { Self { domain: domain.into() } }

    fn binding<F: PrimeField>(digest: &[u8; 32], primary: &[F], auxiliary: &[F]) -> [u8; 32] {
        let mut h = Blake3Hasher::new();
        h.update(b"transcript-proof:v1");
        h.update(digest);
        for (label, values) in [(b'P', primary), (b'A', auxiliary)] {
            h.update(&[label]);
            h.update(&(values.len() as u64).to_le_bytes());
            for v in values {
                h.update(v.to_repr().as_ref());
            }
        }
        *h.finalize().as_bytes()
    }
}

impl<F: PrimeField> ProvingBackend<F> for TranscriptBackend {
    type ProvingKey = TranscriptProvingKey<F>;
    type VerificationKey = TranscriptVerificationKey;
    type Proof = TranscriptProof<F>;

    fn generate_keys(&self, cs: &ConstraintSystem<F>) -> Result<KeyPair<Self::ProvingKey, Self::VerificationKey>> {
        let r1cs_digest = cs.digest(&self.domain);
        let constraints_bytes = cs.to_bytes()?;
        info!(
            constraints = cs.num_constraints(),
            variables = cs.num_variables(),
            bytes = constraints_bytes.len(),
            "generated transcript keys"
        );
        Ok(KeyPair {
            pk: TranscriptProvingKey { domain: self.domain.clone(), r1cs_digest, system: cs.clone() },
            vk: TranscriptVerificationKey {
                domain: self.domain.clone(),
                r1cs_digest,
                constraints_bytes,
                primary_input_size: cs.primary_input_size,
            },
        })
    }

    fn prove(&self, pk: &Self::ProvingKey, primary: &[F], auxiliary: &[F]) -> Result<Self::Proof> {
        if let Some(i) = pk.system.first_unsatisfied(primary, auxiliary)? {
            let annotation = pk.system.constraints[i].annotation.as_deref().unwrap_or("<unnamed>");
            return Err(anyhow!("witness does not satisfy constraint {i} ({annotation})"));
        }
        let binding = Self::binding(&pk.r1cs_digest, primary, auxiliary);
        debug!(auxiliary = auxiliary.len(), "transcript proof created");
        Ok(TranscriptProof {
            version: PROOF_FORMAT_VERSION,
            r1cs_digest: pk.r1cs_digest,
            auxiliary: auxiliary.to_vec(),
            binding,
        })
    }

    fn verify(&self, vk: &Self::VerificationKey, primary: &[F], proof: &Self::Proof) -> Result<bool> {
        let cs = ConstraintSystem::<F>::from_bytes(&vk.constraints_bytes)?;
        // Check digest first
        if cs.digest(&vk.domain) != vk.r1cs_digest {
            return Err(anyhow!("verification key digest does not match its constraints"));
        }
        let accepted = proof.version == PROOF_FORMAT_VERSION
            && proof.r1cs_digest == vk.r1cs_digest
            && primary.len() == vk.primary_input_size
            && proof.auxiliary.len() == cs.auxiliary_input_size
            && Self::binding(&vk.r1cs_digest, primary, &proof.auxiliary) == proof.binding
            && cs.is_satisfied(primary, &proof.auxiliary)?;
        info!(accepted, "transcript proof verified");
        Ok(accepted)
    }
}
