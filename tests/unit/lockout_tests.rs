// ===========================
// tests/unit/lockout_tests.rs
// ===========================
//! Unit tests for the lockout policy
use chrono::{Duration, Utc};
use notes_backend_lib::auth::{remaining_minutes, FailureOutcome, LockoutPolicy};
use notes_backend_lib::error::AppError;
use notes_backend_lib::storage::User;

fn user() -> User {
    User {
        id: 1,
        username: "bob22".to_string(),
        password_hash: String::new(),
        failed_login_attempts: 0,
        lockout_end: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_custom_policy_locks_at_its_threshold() {
    let policy = LockoutPolicy::new(3, Duration::minutes(10));
    let mut user = user();
    let now = Utc::now();

    assert_eq!(policy.record_failure(&mut user, now), FailureOutcome::Counted(1));
    assert_eq!(policy.record_failure(&mut user, now), FailureOutcome::Counted(2));
    assert_eq!(
        policy.record_failure(&mut user, now),
        FailureOutcome::Locked(now + Duration::minutes(10))
    );

    match policy.check(&user, now) {
        Err(AppError::AccountLocked { minutes }) => assert_eq!(minutes, 10),
        other => panic!("expected lockout, got {other:?}"),
    }
    assert!(policy.check(&user, now + Duration::minutes(10)).is_ok());
}

#[test]
fn test_remaining_minutes_rounds_up() {
    let now = Utc::now();
    assert_eq!(remaining_minutes(now + Duration::seconds(1), now), 1);
    assert_eq!(remaining_minutes(now + Duration::seconds(60), now), 1);
    assert_eq!(remaining_minutes(now + Duration::seconds(61), now), 2);
    assert_eq!(remaining_minutes(now - Duration::seconds(5), now), 0);
}
