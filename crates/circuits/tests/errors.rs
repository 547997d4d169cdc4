// circuits/tests/errors.rs
use board::{Board, Error, Gadget, LinearCombination, Params, Variable};
use circuits::{AndGadget, Bit, BitVectorVariable, DigestVariable, Sha256CompressionGadget};
use pasta_curves::Fp;

fn board() -> Board<Fp> { Board::new(Params::with_defaults()) }

#[test]
fn duplicate_assignment() {
    let mut b = board();
    let x = b.allocate("x");
    b.assign(x, Fp::from(1u64)).unwrap();
    assert!(matches!(b.assign(x, Fp::from(2u64)), Err(Error::DuplicateAssignment(v)) if v == x));
}

#[test]
fn unknown_variable() {
    let mut b = board();
    let x = b.allocate("x");
    let ghost = Variable(7);
    assert!(matches!(
        b.add_constraint(x.into(), ghost.into(), LinearCombination::zero(), "ghost"),
        Err(Error::UnknownVariable(v)) if v == ghost
    ));
    assert!(matches!(b.assign(ghost, Fp::from(1u64)), Err(Error::UnknownVariable(_))));
}

#[test]
fn unassigned_evaluation() {
    let mut b = board();
    let x = b.allocate("x");
    assert!(matches!(b.evaluate(&x.into()), Err(Error::UnassignedVariable(v)) if v == x));
    assert!(matches!(b.export_assignment(), Err(Error::UnassignedVariable(_))));
}

#[test]
fn length_mismatch_and_unsupported_length() {
    let mut b = board();
    let mut d = DigestVariable::digest(&mut b, "d");
    assert!(matches!(d.generate_witness(&mut b, &[true; 512]), Err(Error::LengthMismatch { .. })));
    assert!(matches!(BitVectorVariable::with_length(&mut b, 128, "x"), Err(Error::UnsupportedLength(128))));
}

#[test]
fn gadget_misuse() {
    let mut b = board();
    let x = b.allocate("x");
    let mut and = AndGadget::new(&mut b, Bit::Var(x), Bit::Const(true), "and");
    assert!(matches!(Gadget::<Fp>::generate_witness(&mut and, &mut b), Err(Error::InvalidGadgetState { .. })));

    let l = DigestVariable::digest(&mut b, "l");
    let out = DigestVariable::digest(&mut b, "out");
    let mut sha = Sha256CompressionGadget::new(&mut b, &l, &l, &out, "sha").unwrap();
    sha.generate_constraints(&mut b).unwrap();
    assert!(matches!(sha.generate_constraints(&mut b), Err(Error::InvalidGadgetState { .. })));
}

#[test]
fn primary_count_mismatch() {
    let mut b = board();
    b.allocate_vec(3, "v");
    assert!(matches!(b.set_primary_input_count(4), Err(Error::PrimaryInputCountMismatch { .. })));
    b.set_primary_input_count(2).unwrap();
    assert!(matches!(
        b.set_primary_input_count(1),
        Err(Error::PrimaryInputCountMismatch { requested: 1, allocated: 3, fixed: Some(2) })
    ));
}

#[test]
fn non_boolean_value_on_bit() {
    let mut b = board();
    let x = b.allocate("x");
    b.enforce_boolean(x, "x bit").unwrap();
    assert!(matches!(b.assign(x, Fp::from(2u64)), Err(Error::NotBoolean(v)) if v == x));
}
