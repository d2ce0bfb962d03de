// ============================
// tests/unit/password_tests.rs
// ============================
//! Unit tests for password hashing and the password policy
use notes_backend_lib::auth::{
    hash_password, hash_password_blocking, validate_password, verify_password,
    verify_password_blocking,
};
use notes_backend_lib::config::{HashingSettings, PasswordRequirements};

fn cheap() -> HashingSettings {
    HashingSettings {
        scrypt_log_n: 4,
        scrypt_r: 8,
        scrypt_p: 1,
    }
}

#[test]
fn test_password_hashing_and_verification() {
    let hash = hash_password("Str0ng!Pw", &cheap()).unwrap();

    assert_ne!(hash, "Str0ng!Pw");
    assert!(hash.starts_with("$scrypt$"));
    assert!(verify_password(&hash, "Str0ng!Pw"));
    assert!(!verify_password(&hash, "str0ng!Pw"));
    assert!(!verify_password("not a phc string", "Str0ng!Pw"));

    // salted: the same password never hashes the same way twice
    assert_ne!(hash, hash_password("Str0ng!Pw", &cheap()).unwrap());
}

#[tokio::test]
async fn test_blocking_variants() {
    let hash = hash_password_blocking("Str0ng!Pw".to_string(), cheap()).await.unwrap();
    assert!(verify_password_blocking(hash.clone(), "Str0ng!Pw".to_string()).await.unwrap());
    assert!(!verify_password_blocking(hash, "Wr0ng!Pw".to_string()).await.unwrap());
}

#[test]
fn test_password_strength_validation() {
    let requirements = PasswordRequirements::default();

    assert!(validate_password("SecureP@ssw0rd", &requirements).is_empty());

    // every password shorter than the minimum reports the length rule
    for length in 1..8 {
        let password: String = "Aa1!Aa1!".chars().take(length).collect();
        let violations = validate_password(&password, &requirements);
        assert!(
            violations.contains(&"Password must be at least 8 characters long.".to_string()),
            "{password}"
        );
    }

    for missing_one_class in ["securep@ssw0rd", "SECUREP@SSW0RD", "SecureP@ssword", "SecurePassw0rd"] {
        let violations = validate_password(missing_one_class, &requirements);
        assert_eq!(violations.len(), 1, "{missing_one_class}");
    }
}

#[test]
fn test_relaxed_requirements() {
    let requirements = PasswordRequirements {
        require_uppercase: false,
        require_special: false,
        ..PasswordRequirements::default()
    };

    assert!(validate_password("securepassw0rd", &requirements).is_empty());
    assert_eq!(
        validate_password("securepassword", &requirements),
        vec!["Password must include at least one lowercase letter and one number.".to_string()]
    );
}
