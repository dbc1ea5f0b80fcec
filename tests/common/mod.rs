pub mod builders;

use std::error::Error;
use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tokio::time::timeout;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// One-time tracing setup shared by every integration suite.
///
/// Output goes through the test writer, so it is only shown for failing
/// tests (or under `-- --nocapture`). The default filter keeps this
/// crate's spans at debug; override it with `RUST_LOG`, e.g.
/// `RUST_LOG=taskpipe::watch=trace cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("taskpipe=debug,info"));

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Enforce an upper bound on how long an async test may run.
#[allow(dead_code)]
pub async fn with_timeout<F>(fut: F) -> Result<(), Box<dyn Error>>
where
    F: Future<Output = Result<(), Box<dyn Error>>>,
{
    match timeout(Duration::from_secs(5), fut).await {
        Ok(result) => result,
        Err(_) => panic!("test did not finish within 5 seconds"),
    }
}
