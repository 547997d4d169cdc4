// circuits/tests/identity.rs
use board::{Board, Gadget, Params, ProvingBackend, TranscriptBackend};
use circuits::CubicIdentityGadget;
use pasta_curves::Fp;

#[test]
fn cubic_identity_end_to_end() {
    let mut b = Board::<Fp>::new(Params::with_defaults());
    let mut g = CubicIdentityGadget::new(&mut b);
    b.set_primary_input_count(1).unwrap();
    g.generate_constraints(&mut b).unwrap();
    assert_eq!(b.num_constraints(), 4);

    b.assign(g.x, Fp::from(3u64)).unwrap();
    g.generate_witness(&mut b).unwrap();
    for (v, expected) in [(g.sym_1, 9u64), (g.y, 27), (g.sym_2, 30), (g.out, 35)] {
        assert_eq!(b.value(v).unwrap(), Fp::from(expected));
    }
    assert!(b.is_satisfied().unwrap());

    let backend = TranscriptBackend::new(b.params().domain());
    let keys = backend.generate_keys(&b.export_system()).unwrap();
    let w = b.export_assignment().unwrap();
    assert_eq!(w.primary, vec![Fp::from(3u64)]);
    let proof = backend.prove(&keys.pk, &w.primary, &w.auxiliary).unwrap();
    assert!(backend.verify(&keys.vk, &w.primary, &proof).unwrap());
    assert!(!backend.verify(&keys.vk, &[Fp::from(4u64)], &proof).unwrap());
}
