//! Example: driving a flaky operation with a retry policy
//!
//! This example demonstrates:
//! 1. Simple retry with full-jitter backoff and an observer
//! 2. Bailing out of the sequence on a permanent error
//! 3. Picking the policy from configuration
//!
//! Run with:
//! ```bash
//! cargo run -p tenax --example retry_example
//! ```

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use tenax::prelude::*;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            Err(std::io::Error::other(format!(
                "transient error on attempt {}",
                attempt + 1
            )))
        } else {
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: simple retry with full jitter and an observer
async fn example_simple_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Retry with Full-Jitter Backoff ===\n");

    let mut policy = RetryPolicy::builder()
        .retries(5)
        .backoff(FullJitterBackoff::new(
            ExponentialBackoff::builder()
                .base(Duration::from_millis(50))
                .cap(Duration::from_secs(1))
                .build(),
        ))
        .on_retry(|error: &std::io::Error, attempt, delay| {
            println!("  attempt {attempt} failed ({error}), retrying in {delay:?}");
            Ok(())
        })
        .build();

    let api = UnreliableApi::new(2); // Fail first 2 attempts
    let start = Instant::now();

    let result = policy
        .run(|_bail, _attempt| {
            let api = &api;
            async move { api.call().await }
        })
        .await?;

    println!("\nResult: {result}");
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}

/// Example 2: bailing out on a permanent error
async fn example_bail() {
    println!("\n=== Example 2: Bailing Out on a Permanent Error ===\n");

    let result: Result<(), _> = tenax::retry(|bail, attempt| async move {
        println!("  attempt {attempt}: checking credentials");
        // Bad credentials will not get better on their own; stop the sequence.
        bail.out(std::io::Error::other("invalid credentials"));
        Err(std::io::Error::other("unreachable attempt error"))
    })
    .await;

    let error = result.unwrap_err();
    println!("Bailed: {} (is_bailed = {})", error, error.is_bailed());
}

/// Example 3: policy from configuration
async fn example_from_config() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Policy from Configuration ===\n");

    let config: RetryConfig = toml::from_str(
        r#"
        retries = 3

        [backoff]
        strategy = "equal_jitter"
        base_ms = 40
        cap_ms = 500
        "#,
    )?;

    let api = UnreliableApi::new(1);
    let mut policy = config.into_policy();

    let result = policy
        .run(|_bail, _attempt| {
            let api = &api;
            async move { api.call().await }
        })
        .await?;

    println!("Result: {result}");
    println!("Total attempts: {}", api.total_attempts());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    example_simple_retry().await?;
    example_bail().await;
    example_from_config().await?;

    println!("\nAll examples completed.\n");
    Ok(())
}
