// tests/engine_properties.rs

mod common;
use crate::common::{FakeLauncher, RunPolicyBuilder};

use proptest::prelude::*;

use runner::engine::Engine;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #[test]
    fn attempts_stop_at_first_healthy_or_budget(
        exit_codes in proptest::collection::vec(0i32..4, 1..8),
        retries in 0u32..6,
        healthy in proptest::collection::btree_set(0i32..4, 0..3),
    ) {
        let mut launcher = FakeLauncher::new();
        for code in &exit_codes {
            launcher = launcher.then_exit("x", *code);
        }
        let healthy_codes: Vec<i32> = healthy.iter().copied().collect();
        let policy = RunPolicyBuilder::new("job")
            .retries(retries)
            .healthy(&healthy_codes)
            .build();

        let outcome = block_on(Engine::new(launcher.clone()).run(&policy, Vec::new())).unwrap();

        // Past the script the fake repeats its last exit code.
        let code_at = |i: usize| exit_codes[i.min(exit_codes.len() - 1)];
        let max = retries as usize + 1;
        let effective_healthy = if healthy.is_empty() { vec![0] } else { healthy_codes.clone() };
        let first_healthy = (0..max).find(|&i| effective_healthy.contains(&code_at(i)));

        let expected_attempts = first_healthy.map(|i| i + 1).unwrap_or(max);
        prop_assert_eq!(outcome.attempts as usize, expected_attempts);
        prop_assert_eq!(launcher.launch_count(), expected_attempts);
        prop_assert_eq!(outcome.success, first_healthy.is_some());
        prop_assert_eq!(outcome.exit_code, code_at(expected_attempts - 1));
        prop_assert!(outcome.attempts <= retries + 1);
        prop_assert_eq!(outcome.output.matches("- Retrying -").count(), expected_attempts - 1);
    }

    #[test]
    fn unhealthy_outcomes_always_surface(retries in 0u32..4, code in 1i32..255) {
        let launcher = FakeLauncher::new().then_exit("boom", code);
        let policy = RunPolicyBuilder::new("job").retries(retries).build();

        let outcome = block_on(Engine::new(launcher).run(&policy, Vec::new())).unwrap();

        prop_assert!(!outcome.success);
        prop_assert!(outcome.should_surface);
    }
}
