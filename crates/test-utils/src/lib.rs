pub mod builders;
pub mod fake_launcher;
pub mod recording_channel;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

pub use builders::RunPolicyBuilder;
pub use fake_launcher::FakeLauncher;
pub use recording_channel::{Behaviour, RecordingChannel};

static INIT: Once = Once::new();

/// Route runner's events to the test writer, so they show up only for
/// failing tests (or with `-- --nocapture`).
///
/// `RUST_LOG` overrides the default of `debug` for runner, `warn` elsewhere.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,runner=debug"));

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Upper bound for anything that spawns real processes or talks to a mock
/// server.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(v) => v,
        Err(_) => panic!("test step did not finish within {TEST_TIMEOUT:?}"),
    }
}
