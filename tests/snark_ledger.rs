//! End-to-end SNARK-construction scenarios through the ledger surface
//! (`spec.md` §8 S-4, S-5): a full Groth16 setup/prove/verify cycle, and a
//! parameter-mismatch rejection.

use ark_bn254::Fr;
use ark_ec::{CurveGroup, Group};
use ark_ed_on_bn254::Fr as EdScalar;
use ark_ff::{BigInteger, PrimeField, UniformRand};
use ark_std::rand::{rngs::StdRng, SeedableRng};

use s3cross::edwards::EdPoint;
use s3cross::error::S3CrossError;
use s3cross::ledger::Ledger;
use s3cross::snark_verifier::{self, PublicInputs, Witness};
use s3cross::{elgamal_edwards, merkle, mimc, pseudonym, schnorr_edwards};

const DEPTH: usize = 4;

struct Fixture {
    public: PublicInputs,
    witness: Witness,
    issuer_pk: EdPoint,
    session_pk: EdPoint,
    root: Fr,
}

fn build_fixture(seed: u64) -> Fixture {
    let mut rng = StdRng::seed_from_u64(seed);

    let issuer = schnorr_edwards::KeyPair::generate(&mut rng);
    let user_sk = EdScalar::rand(&mut rng);
    let user_pk = EdPoint::generator() * user_sk;

    let (sig, _r) = schnorr_edwards::sign(&issuer, user_pk, &mut rng);
    assert!(schnorr_edwards::verify(&sig));

    let nonce_point = EdPoint::generator() * EdScalar::rand(&mut rng);
    let nonce_scalar = pseudonym::derive_nonce_scalar(&nonce_point);
    let counter = 3u64;
    let pseudonym_keys = pseudonym::gen_pseudonym(user_sk, counter, nonce_scalar);

    let leaf_x = {
        let affine = pseudonym_keys.pk.into_affine();
        mimc::hash(&[affine.x, affine.y])
    };
    let mut leaves = vec![
        s3cross::curve::Scalar::from(0u64),
        leaf_x + s3cross::curve::Scalar::from(1_000_000u64),
    ];
    leaves.push(mimc::scalar_from_bytes_mod_order(
        &merkle::sentinel_leaf_bytes(),
    ));
    leaves.sort();
    leaves.dedup();

    let tree = merkle::MerkleTree::build(leaves, DEPTH);
    let membership = tree.non_membership_proof(leaf_x).unwrap();
    assert!(merkle::verify_inclusion(&membership).is_ok());

    let session = schnorr_edwards::KeyPair::generate(&mut rng);
    let (ct, r_elgamal) = elgamal_edwards::encrypt(user_pk, session.pk, &mut rng);
    assert_eq!(elgamal_edwards::decrypt(&session, &ct), user_pk);

    let (siblings, index) = Witness::merkle_witness_from_proof(&membership);
    let affine = |p: &EdPoint| {
        let a = p.into_affine();
        (a.x, a.y)
    };
    let (i_pk_x, i_pk_y) = affine(&issuer.pk);
    let (p_pk_x, p_pk_y) = affine(&pseudonym_keys.pk);
    let (s_pk_x, s_pk_y) = affine(&session.pk);
    let (c1_x, c1_y) = affine(&ct.c1);
    let (c2_x, c2_y) = affine(&ct.c2);

    let public = PublicInputs {
        root: membership.root,
        leaf1: membership.leaf1,
        leaf2: membership.leaf2,
        i_pk_x,
        i_pk_y,
        p_pk_x,
        p_pk_y,
        nonce: nonce_scalar,
        s_pk_x,
        s_pk_y,
        c1_x,
        c1_y,
        c2_x,
        c2_y,
    };

    let lift = |s: &EdScalar| -> Fr {
        let bytes = s.into_bigint().to_bytes_be();
        Fr::from_be_bytes_mod_order(&bytes)
    };
    let (r_x, r_y) = affine(&sig.r);
    let (message_x, message_y) = affine(&sig.message);

    let witness = Witness {
        merkle_siblings: siblings,
        merkle_index: index,
        sig: lift(&sig.s),
        r_x,
        r_y,
        message_x,
        message_y,
        u_sk: lift(&user_sk),
        i: Fr::from(counter),
        r_elgamal: lift(&r_elgamal),
    };

    Fixture {
        public,
        witness,
        issuer_pk: issuer.pk,
        session_pk: session.pk,
        root: membership.root,
    }
}

#[test]
fn s4_snark_happy_path_admits_through_the_ledger() {
    let fixture = build_fixture(9001);
    let mut rng = StdRng::seed_from_u64(9002);

    let (pk, vk) = snark_verifier::setup(DEPTH, &mut rng).expect("groth16 setup");
    let circuit = snark_verifier::build_circuit(DEPTH, &fixture.public, &fixture.witness);
    let proof = snark_verifier::prove(&pk, circuit, &mut rng).expect("groth16 prove");

    let ledger = Ledger::new();
    ledger
        .init_ledger_snark(&fixture.issuer_pk, &fixture.session_pk, fixture.root, &vk)
        .unwrap();

    let record = ledger
        .create_pseudonym_snark(&proof, &fixture.public, 5_000)
        .unwrap();
    assert!(!record.used);
    assert_ne!(record.c1, record.c2);

    let fetched = ledger.query_pseudonym_by_pbk(&record.public_key).unwrap();
    assert_eq!(fetched, record);
    assert!(ledger.is_pseudonym_valid(&record.public_key, 5_000 + 100).unwrap());
}

#[test]
fn s5_snark_param_mismatch_is_rejected() {
    let fixture = build_fixture(9101);
    let mut rng = StdRng::seed_from_u64(9102);

    let (pk, vk) = snark_verifier::setup(DEPTH, &mut rng).expect("groth16 setup");
    let circuit = snark_verifier::build_circuit(DEPTH, &fixture.public, &fixture.witness);
    let proof = snark_verifier::prove(&pk, circuit, &mut rng).expect("groth16 prove");

    let ledger = Ledger::new();
    // Initialize with a *different* issuer key than the one the proof was
    // actually issued under, simulating a ledger whose stored `IPK` has
    // drifted from the proof's witness.
    let wrong_issuer_pk = EdPoint::generator() * EdScalar::rand(&mut rng);
    ledger
        .init_ledger_snark(&wrong_issuer_pk, &fixture.session_pk, fixture.root, &vk)
        .unwrap();

    let err = ledger
        .create_pseudonym_snark(&proof, &fixture.public, 5_000)
        .unwrap_err();
    assert!(matches!(err, S3CrossError::ParamsMismatch(_)));
}
