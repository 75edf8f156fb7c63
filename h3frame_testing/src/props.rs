//! Deterministic randomness for property tests.

use proptest::{
    prelude::RngCore,
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestRng, TestRunner},
};

/// Property runner seeded with a fixed `ChaCha` stream, so failures
/// reproduce across runs.
#[must_use]
pub fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    let rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    TestRunner::new_with_rng(config, rng)
}

/// `len` pseudo-random bytes from the same fixed seed.
#[must_use]
pub fn random_payload(len: usize) -> Vec<u8> {
    let mut rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    let mut payload = vec![0; len];
    rng.fill_bytes(&mut payload);
    payload
}
