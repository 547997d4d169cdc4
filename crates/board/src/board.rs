//! The constraint board: one instance per circuit.
//!
//! Owns variable allocation, constraint emission and the witness being built.
//! Gadgets borrow it mutably while they allocate, constrain and assign.

use std::sync::Arc;

use ff::PrimeField;
use tracing::{debug, warn};

use crate::config::Params;
use crate::error::{Error, Result};
use crate::r1cs::{Assignment, Constraint, ConstraintSystem, LinearCombination, Variable};

#[derive(Debug, Clone)]
pub struct Board<F: PrimeField> {
    params: Arc<Params<F>>,
    names: Vec<Option<String>>,
    values: Vec<Option<F>>,
    boolean: Vec<bool>,
    constraints: Vec<Constraint<F>>,
    primary_input_size: Option<usize>,
}

impl<F: PrimeField> Board<F> {
    pub fn new(params: Arc<Params<F>>) -> Self {
        Self {
            params,
            names: Vec::new(),
            values: Vec::new(),
            boolean: Vec::new(),
            constraints: Vec::new(),
            primary_input_size: None,
        }
    }

    #[inline]
    pub fn params(&self) -> &Arc<Params<F>> { &self.params }

    #[inline]
    pub fn num_variables(&self) -> usize { self.values.len() }

    #[inline]
    pub fn num_constraints(&self) -> usize { self.constraints.len() }

    /// Declared public prefix; zero until `set_primary_input_count` is called.
    #[inline]
    pub fn primary_input_size(&self) -> usize { self.primary_input_size.unwrap_or(0) }

    pub fn allocate(&mut self, name: impl Into<String>) -> Variable {
        let v = Variable(self.values.len());
        self.names.push(self.params.annotations().then(|| name.into()));
        self.values.push(None);
        self.boolean.push(false);
        v
    }

    pub fn allocate_vec(&mut self, n: usize, prefix: &str) -> Vec<Variable> {
        (0..n).map(|i| self.allocate(format!("{prefix}[{i}]"))).collect()
    }

    pub fn name(&self, v: Variable) -> Option<&str> {
        self.names.get(v.0).and_then(|n| n.as_deref())
    }

    /// Fix how many of the earliest allocated variables are public.
    pub fn set_primary_input_count(&mut self, n: usize) -> Result<()> {
        let allocated = self.num_variables();
        let consistent = n <= allocated && self.primary_input_size.map_or(true, |fixed| fixed == n);
        if !consistent {
            return Err(Error::PrimaryInputCountMismatch { requested: n, allocated, fixed: self.primary_input_size });
        }
        self.primary_input_size = Some(n);
        Ok(())
    }

    fn check_known(&self, v: Variable) -> Result<()> {
        if v.0 < self.values.len() { Ok(()) } else { Err(Error::UnknownVariable(v)) }
    }

    fn check_lc(&self, lc: &LinearCombination<F>) -> Result<()> {
        lc.terms.iter().try_for_each(|t| self.check_known(t.var))
    }

    /// Record a multiplication constraint: A * B = C
    pub fn add_constraint(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
        annotation: impl Into<String>,
    ) -> Result<()> {
        self.check_lc(&a)?;
        self.check_lc(&b)?;
        self.check_lc(&c)?;
        let annotation = self.params.annotations().then(|| annotation.into());
        self.constraints.push(Constraint::new(a, b, c, annotation));
        Ok(())
    }

    /// Enforce a == b, encoded as (a - b) * 1 = 0
    pub fn enforce_equal(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        annotation: impl Into<String>,
    ) -> Result<()> {
        self.add_constraint(a - b, LinearCombination::one(), LinearCombination::zero(), annotation)
    }

    /// Constrain `v` to be boolean: v * (1 - v) = 0. Emitted at most once per variable.
    pub fn enforce_boolean(&mut self, v: Variable, annotation: impl Into<String>) -> Result<()> {
        self.check_known(v)?;
        if self.boolean[v.0] {
            return Ok(());
        }
        self.add_constraint(v.into(), LinearCombination::one() - v, LinearCombination::zero(), annotation)?;
        self.boolean[v.0] = true;
        if let Some(value) = self.values[v.0] {
            if !is_bit(value) {
                return Err(Error::NotBoolean(v));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_boolean(&self, v: Variable) -> bool { self.boolean.get(v.0).copied().unwrap_or(false) }

    pub fn assign(&mut self, v: Variable, value: F) -> Result<()> {
        self.check_known(v)?;
        if self.values[v.0].is_some() {
            return Err(Error::DuplicateAssignment(v));
        }
        if self.boolean[v.0] && !is_bit(value) {
            return Err(Error::NotBoolean(v));
        }
        self.values[v.0] = Some(value);
        Ok(())
    }

    pub fn assign_bit(&mut self, v: Variable, bit: bool) -> Result<()> {
        self.assign(v, if bit { F::ONE } else { F::ZERO })
    }

    #[inline]
    pub fn is_assigned(&self, v: Variable) -> bool { matches!(self.values.get(v.0), Some(Some(_))) }

    pub fn try_value(&self, v: Variable) -> Option<F> { self.values.get(v.0).copied().flatten() }

    pub fn value(&self, v: Variable) -> Result<F> {
        self.check_known(v)?;
        self.values[v.0].ok_or(Error::UnassignedVariable(v))
    }

    /// Read a boolean variable's value.
    pub fn bit_value(&self, v: Variable) -> Result<bool> {
        let value = self.value(v)?;
        if value == F::ZERO {
            Ok(false)
        } else if value == F::ONE {
            Ok(true)
        } else {
            Err(Error::NotBoolean(v))
        }
    }

    pub fn evaluate(&self, lc: &LinearCombination<F>) -> Result<F> {
        lc.evaluate(|v| self.value(v))
    }

    pub fn constraints(&self) -> &[Constraint<F>] { &self.constraints }

    /// Snapshot of the constraint system as built so far.
    pub fn export_system(&self) -> ConstraintSystem<F> {
        let primary = self.primary_input_size();
        let cs = ConstraintSystem {
            primary_input_size: primary,
            auxiliary_input_size: self.num_variables() - primary,
            constraints: self.constraints.clone(),
        };
        debug!(
            constraints = cs.num_constraints(),
            primary = cs.primary_input_size,
            auxiliary = cs.auxiliary_input_size,
            "exported constraint system"
        );
        cs
    }

    /// Snapshot of the full witness split at the primary input count.
    pub fn export_assignment(&self) -> Result<Assignment<F>> {
        let primary = self.primary_input_size();
        let mut full = Vec::with_capacity(self.values.len());
        for (i, value) in self.values.iter().enumerate() {
            full.push(value.ok_or(Error::UnassignedVariable(Variable(i)))?);
        }
        let auxiliary = full.split_off(primary);
        Ok(Assignment { primary: full, auxiliary })
    }

    /// First constraint violated by the current assignment, with its annotation.
    pub fn first_unsatisfied(&self) -> Result<Option<(usize, Option<String>)>> {
        for (i, c) in self.constraints.iter().enumerate() {
            let a = self.evaluate(&c.a)?;
            let b = self.evaluate(&c.b)?;
            let cv = self.evaluate(&c.c)?;
            if a * b != cv {
                warn!(index = i, annotation = ?c.annotation, "constraint not satisfied");
                return Ok(Some((i, c.annotation.clone())));
            }
        }
        Ok(None)
    }

    pub fn is_satisfied(&self) -> Result<bool> { Ok(self.first_unsatisfied()?.is_none()) }
}

fn is_bit<F: PrimeField>(value: F) -> bool { value == F::ZERO || value == F::ONE }
