//! End-to-end behavior of the retry orchestrator through the public API.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tenax::prelude::*;

#[tokio::test]
async fn bail_wins_over_a_failing_attempt() {
    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = Arc::clone(&attempts);

    let mut policy = RetryPolicy::builder().retries(10).build();
    let result = policy
        .run(|bail, attempt| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                if attempt == 2 {
                    bail.out(std::io::Error::other("unrecoverable"));
                    return Err(std::io::Error::other("attempt error"));
                }
                Err::<(), _>(std::io::Error::other("transient"))
            }
        })
        .await;

    // No attempt 3, and the bail reason beats the attempt's own error.
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    let error = result.unwrap_err();
    assert!(error.is_bailed());
    assert_eq!(error.to_string(), "unrecoverable");
}

#[tokio::test]
async fn bail_wins_even_when_the_attempt_succeeds() {
    let result = tenax::retry(|bail, _attempt| async move {
        bail.out(std::io::Error::other("stop anyway"));
        Ok(42)
    })
    .await;

    let error = result.unwrap_err();
    assert!(error.is_bailed());
    assert_eq!(error.to_string(), "stop anyway");
}

#[tokio::test]
async fn bail_without_reason_uses_the_sentinel_message() {
    let result: Result<(), _> = tenax::retry(|bail, _attempt| async move {
        bail.out_without_reason();
        Err(std::io::Error::other("ignored"))
    })
    .await;

    let error = result.unwrap_err();
    assert!(error.is_bailed());
    assert_eq!(error.to_string(), "Bailed without giving a reason.");
    assert_eq!(error.to_string(), tenax::BAILED_WITHOUT_REASON);
}

#[tokio::test(start_paused = true)]
async fn constant_backoff_delays_the_second_attempt() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let observed_clone = Arc::clone(&observed);

    let mut policy = RetryPolicy::builder()
        .retries(1)
        .backoff(ConstantBackoff::new(Duration::from_millis(200)))
        .on_retry(move |_error, attempt, delay| {
            observed_clone.lock().unwrap().push((attempt, delay));
            Ok(())
        })
        .build();

    let started = tokio::time::Instant::now();
    let second_attempt_at = Arc::new(Mutex::new(None));
    let second_attempt_clone = Arc::clone(&second_attempt_at);

    let result = policy
        .run(|_bail, attempt| {
            let second_attempt_at = Arc::clone(&second_attempt_clone);
            async move {
                if attempt == 1 {
                    Err(std::io::Error::other("first try fails"))
                } else {
                    *second_attempt_at.lock().unwrap() = Some(tokio::time::Instant::now());
                    Ok("made it")
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), "made it");
    assert_eq!(
        *observed.lock().unwrap(),
        vec![(1, Duration::from_millis(200))]
    );

    let resumed = second_attempt_at.lock().unwrap().expect("second attempt ran");
    assert!(resumed.duration_since(started) >= Duration::from_millis(200));
}

#[tokio::test]
async fn default_budget_allows_eleven_invocations() {
    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = Arc::clone(&attempts);

    let result: Result<(), _> = tenax::retry(|_bail, _attempt| {
        let attempts = Arc::clone(&attempts_clone);
        async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(std::io::Error::other("never succeeds"))
        }
    })
    .await;

    assert_eq!(attempts.load(Ordering::SeqCst), 11);
    assert!(matches!(
        result.unwrap_err(),
        RetryError::Exhausted { attempts: 11, .. }
    ));
}

#[tokio::test]
async fn observer_can_refuse_to_retry_a_specific_error() {
    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = Arc::clone(&attempts);

    let mut policy = RetryPolicy::builder()
        .retries(10)
        .on_retry(|error: &std::io::Error, _attempt, _delay| {
            if error.kind() == std::io::ErrorKind::PermissionDenied {
                Err(std::io::Error::new(error.kind(), "not retrying auth errors"))
            } else {
                Ok(())
            }
        })
        .build();

    let result = policy
        .run(|_bail, attempt| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 {
                    Err::<(), _>(std::io::Error::other("transient"))
                } else {
                    Err(std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "auth failed",
                    ))
                }
            }
        })
        .await;

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    match result.unwrap_err() {
        RetryError::ObserverAborted { attempt: 3, error } => {
            assert_eq!(error.to_string(), "not retrying auth errors");
        }
        other => panic!("expected ObserverAborted, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn config_file_drives_the_whole_loop() {
    let config: RetryConfig = toml::from_str(
        "retries = 2\n\n[backoff]\nstrategy = \"constant\"\ndelay_ms = 75\n",
    )
    .unwrap();

    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = Arc::clone(&attempts);

    let started = tokio::time::Instant::now();
    let mut policy = config.into_policy();
    let result: Result<(), _> = policy
        .run(|_bail, _attempt| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(std::io::Error::other("always fail"))
            }
        })
        .await;

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(matches!(
        result.unwrap_err(),
        RetryError::Exhausted { attempts: 3, .. }
    ));
    // Two inter-attempt waits of 75ms each; the exhausting attempt waits for
    // nothing.
    let elapsed = tokio::time::Instant::now().duration_since(started);
    assert!(elapsed >= Duration::from_millis(150));
    assert!(elapsed < Duration::from_millis(225));
}

#[tokio::test]
async fn a_policy_can_be_reused_and_each_run_starts_fresh() {
    let mut policy = RetryPolicy::builder()
        .retries(2)
        .backoff(DecorrelatedJitterBackoff::new(
            Duration::from_millis(1),
            Duration::from_millis(1),
            1,
        ))
        .build();

    for _ in 0..2 {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let result = policy
            .run(|_bail, attempt| {
                let seen = Arc::clone(&seen_clone);
                async move {
                    seen.lock().unwrap().push(attempt);
                    if attempt < 2 {
                        Err(std::io::Error::other("first try fails"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        // Attempt numbering restarts at 1 for every run; only the backoff
        // generator carries state across runs.
        assert_eq!(result.unwrap(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
