//! Rank-1 constraint system objects.
//!
//! Provides:
//! - `Variable` handles and `LinearCombination`s with an implicit constant wire
//! - `Constraint` triples `<A, w> * <B, w> = <C, w>` with an annotation
//! - `ConstraintSystem` snapshots with a structure digest and bincode persistence
//! - `Assignment`s split into primary and auxiliary input

use core::ops::{Add, AddAssign, Mul, Neg, Sub};
use std::collections::BTreeMap;

use blake3::Hasher as Blake3Hasher;
use ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Index of a wire on the board. Allocated monotonically and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variable(pub usize);

impl Variable {
    #[inline]
    pub fn index(self) -> usize { self.0 }
}

/// A single term of a linear combination: coeff * var
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: PrimeField", deserialize = "F: PrimeField"))]
pub struct LinearTerm<F: PrimeField> {
    pub var: Variable,
    #[serde(with = "serde_field_bytes")]
    pub coeff: F,
}

/// A linear combination: sum_i coeff_i * var_i + constant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: PrimeField", deserialize = "F: PrimeField"))]
pub struct LinearCombination<F: PrimeField> {
    pub terms: Vec<LinearTerm<F>>,
    #[serde(with = "serde_field_bytes")]
    pub constant: F,
}

impl<F: PrimeField> Default for LinearCombination<F> {
    fn default() -> Self { Self::zero() }
}

impl<F: PrimeField> LinearCombination<F> {
    pub fn zero() -> Self { Self { terms: Vec::new(), constant: F::ZERO } }
    pub fn one() -> Self { Self::constant(F::ONE) }
    pub fn constant(c: F) -> Self { Self { terms: Vec::new(), constant: c } }

    #[inline]
    pub fn add_constant(mut self, c: F) -> Self { self.constant += c; self }

    #[inline]
    pub fn push_term(&mut self, var: Variable, coeff: F) { self.terms.push(LinearTerm { var, coeff }); }

    /// Convenience builder: lc + coeff * var
    #[inline]
    pub fn add(mut self, var: Variable, coeff: F) -> Self { self.push_term(var, coeff); self }

    pub fn scale(mut self, c: F) -> Self {
        for t in self.terms.iter_mut() { t.coeff *= c; }
        self.constant *= c;
        self
    }

    /// Highest variable index referenced, if any.
    pub fn max_variable(&self) -> Option<Variable> { self.terms.iter().map(|t| t.var).max() }

    /// Merge duplicate variables, drop zero coefficients and sort terms by variable.
    /// Evaluation is unchanged; diagnostics and digests become order-independent.
    pub fn compress(self) -> Self {
        let mut merged: BTreeMap<Variable, F> = BTreeMap::new();
        for t in self.terms {
            *merged.entry(t.var).or_insert(F::ZERO) += t.coeff;
        }
        let terms = merged
            .into_iter()
            .filter(|(_, c)| !bool::from(c.is_zero()))
            .map(|(var, coeff)| LinearTerm { var, coeff })
            .collect();
        Self { terms, constant: self.constant }
    }

    /// Evaluate against an assignment lookup. The lookup decides which
    /// error a missing wire maps to.
    pub fn evaluate(&self, mut lookup: impl FnMut(Variable) -> Result<F>) -> Result<F> {
        let mut acc = self.constant;
        for t in &self.terms {
            acc += lookup(t.var)? * t.coeff;
        }
        Ok(acc)
    }
}

impl<F: PrimeField> From<Variable> for LinearCombination<F> {
    fn from(v: Variable) -> Self { Self::zero().add(v, F::ONE) }
}

impl<F: PrimeField> Add for LinearCombination<F> {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<F: PrimeField> AddAssign for LinearCombination<F> {
    fn add_assign(&mut self, rhs: Self) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl<F: PrimeField> Add<Variable> for LinearCombination<F> {
    type Output = Self;
    fn add(self, rhs: Variable) -> Self { LinearCombination::add(self, rhs, F::ONE) }
}

impl<F: PrimeField> Sub for LinearCombination<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { self + (-rhs) }
}

impl<F: PrimeField> Sub<Variable> for LinearCombination<F> {
    type Output = Self;
    fn sub(self, rhs: Variable) -> Self { LinearCombination::add(self, rhs, -F::ONE) }
}

impl<F: PrimeField> Neg for LinearCombination<F> {
    type Output = Self;
    fn neg(self) -> Self { self.scale(-F::ONE) }
}

impl<F: PrimeField> Mul<F> for LinearCombination<F> {
    type Output = Self;
    fn mul(self, rhs: F) -> Self { self.scale(rhs) }
}

/// One R1CS constraint: <A, w> * <B, w> = <C, w>
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: PrimeField", deserialize = "F: PrimeField"))]
pub struct Constraint<F: PrimeField> {
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
    pub annotation: Option<String>,
}

impl<F: PrimeField> Constraint<F> {
    pub fn new(
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
        annotation: Option<String>,
    ) -> Self {
        Self { a, b, c, annotation }
    }

    /// Evaluate (A, B, C) over a full assignment vector indexed by variable.
    pub fn evaluate(&self, full: &[F]) -> Result<(F, F, F)> {
        let get = |v: Variable| full.get(v.0).copied().ok_or(Error::UnknownVariable(v));
        Ok((self.a.evaluate(get)?, self.b.evaluate(get)?, self.c.evaluate(get)?))
    }

    pub fn is_satisfied(&self, full: &[F]) -> Result<bool> {
        let (a, b, c) = self.evaluate(full)?;
        Ok(a * b == c)
    }

    pub fn max_variable(&self) -> Option<Variable> {
        [self.a.max_variable(), self.b.max_variable(), self.c.max_variable()]
            .into_iter()
            .flatten()
            .max()
    }
}

/// Finished constraint system. The first `primary_input_size` variables are public.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: PrimeField", deserialize = "F: PrimeField"))]
pub struct ConstraintSystem<F: PrimeField> {
    pub primary_input_size: usize,
    pub auxiliary_input_size: usize,
    pub constraints: Vec<Constraint<F>>,
}

impl<F: PrimeField> ConstraintSystem<F> {
    #[inline]
    pub fn num_variables(&self) -> usize { self.primary_input_size + self.auxiliary_input_size }

    #[inline]
    pub fn num_constraints(&self) -> usize { self.constraints.len() }

    fn full_assignment(&self, primary: &[F], auxiliary: &[F]) -> Result<Vec<F>> {
        if primary.len() != self.primary_input_size {
            return Err(Error::LengthMismatch { expected: self.primary_input_size, actual: primary.len() });
        }
        if auxiliary.len() != self.auxiliary_input_size {
            return Err(Error::LengthMismatch { expected: self.auxiliary_input_size, actual: auxiliary.len() });
        }
        let mut full = Vec::with_capacity(self.num_variables());
        full.extend_from_slice(primary);
        full.extend_from_slice(auxiliary);
        Ok(full)
    }

    /// Index of the first constraint the assignment violates, if any.
    pub fn first_unsatisfied(&self, primary: &[F], auxiliary: &[F]) -> Result<Option<usize>> {
        let full = self.full_assignment(primary, auxiliary)?;
        for (i, c) in self.constraints.iter().enumerate() {
            if !c.is_satisfied(&full)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    pub fn is_satisfied(&self, primary: &[F], auxiliary: &[F]) -> Result<bool> {
        Ok(self.first_unsatisfied(primary, auxiliary)?.is_none())
    }

    /// Canonical structure digest (excludes annotations and any assignment).
    pub fn digest(&self, domain: &[u8]) -> [u8; 32] {
        let mut h = Blake3Hasher::new();
        h.update(b"r1cs:v1");
        h.update(&(domain.len() as u64).to_le_bytes());
        h.update(domain);
        h.update(&(self.primary_input_size as u64).to_le_bytes());
        h.update(&(self.auxiliary_input_size as u64).to_le_bytes());
        h.update(&(self.constraints.len() as u64).to_le_bytes());
        let mut emit_lc = |lc: &LinearCombination<F>| {
            h.update(lc.constant.to_repr().as_ref());
            h.update(&(lc.terms.len() as u64).to_le_bytes());
            for t in &lc.terms {
                h.update(&(t.var.0 as u64).to_le_bytes());
                h.update(t.coeff.to_repr().as_ref());
            }
        };
        for c in &self.constraints {
            emit_lc(&c.a);
            emit_lc(&c.b);
            emit_lc(&c.c);
        }
        *h.finalize().as_bytes()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Serialize(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cs: Self = bincode::deserialize(bytes)?;
        let n = cs.num_variables();
        for c in &cs.constraints {
            if let Some(v) = c.max_variable().filter(|v| v.0 >= n) {
                return Err(Error::UnknownVariable(v));
            }
        }
        Ok(cs)
    }
}

/// Witness split at the primary input count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "F: PrimeField", deserialize = "F: PrimeField"))]
pub struct Assignment<F: PrimeField> {
    #[serde(with = "serde_vec_field_bytes")]
    pub primary: Vec<F>,
    #[serde(with = "serde_vec_field_bytes")]
    pub auxiliary: Vec<F>,
}

impl<F: PrimeField> Assignment<F> {
    pub fn len(&self) -> usize { self.primary.len() + self.auxiliary.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Value of `v` in the concatenated (primary ‖ auxiliary) vector.
    pub fn get(&self, v: Variable) -> Option<F> {
        if v.0 < self.primary.len() {
            self.primary.get(v.0).copied()
        } else {
            self.auxiliary.get(v.0 - self.primary.len()).copied()
        }
    }

    pub fn get_mut(&mut self, v: Variable) -> Option<&mut F> {
        let p = self.primary.len();
        if v.0 < p { self.primary.get_mut(v.0) } else { self.auxiliary.get_mut(v.0 - p) }
    }
}

// (De)serialize a field element as its canonical byte representation
pub mod serde_field_bytes {
    use ff::PrimeField;
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<F: PrimeField, S: Serializer>(f: &F, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bytes(f.to_repr().as_ref())
    }

    pub fn deserialize<'de, F: PrimeField, D: Deserializer<'de>>(d: D) -> Result<F, D::Error> {
        let bytes = Vec::<u8>::deserialize(d)?;
        super::field_from_bytes(&bytes).ok_or_else(|| DeError::custom("invalid field repr"))
    }
}

// Helper module to (de)serialize Vec<F> where F: PrimeField, as sequences of canonical bytes
pub mod serde_vec_field_bytes {
    use core::marker::PhantomData;
    use ff::PrimeField;
    use serde::de::{Error as DeError, SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserializer, Serializer};

    pub fn serialize<F: PrimeField, S: Serializer>(v: &[F], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(v.len()))?;
        for f in v.iter() {
            let repr = f.to_repr();
            seq.serialize_element(repr.as_ref())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, F: PrimeField, D: Deserializer<'de>>(d: D) -> Result<Vec<F>, D::Error> {
        struct VecVisitor<F: PrimeField>(PhantomData<F>);
        impl<'de, F: PrimeField> Visitor<'de> for VecVisitor<F> {
            type Value = Vec<F>;
            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result { write!(f, "sequence of field bytes") }
            fn visit_seq<A: SeqAccess<'de>>(self, mut a: A) -> Result<Self::Value, A::Error> {
                let mut out: Vec<F> = Vec::new();
                while let Some(bytes) = a.next_element::<Vec<u8>>()? {
                    match super::field_from_bytes(&bytes) {
                        Some(v) => out.push(v),
                        None => return Err(DeError::custom("invalid field repr")),
                    }
                }
                Ok(out)
            }
        }
        d.deserialize_seq(VecVisitor::<F>(PhantomData))
    }
}

pub(crate) fn field_from_bytes<F: PrimeField>(bytes: &[u8]) -> Option<F> {
    let mut repr = F::Repr::default();
    if bytes.len() != repr.as_ref().len() {
        return None;
    }
    repr.as_mut().copy_from_slice(bytes);
    F::from_repr(repr).into()
}
