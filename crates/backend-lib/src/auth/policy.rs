//! Registration rules for usernames and passwords.
//!
//! Every rule is evaluated and each violation is reported on its own, so a
//! client can show the complete list in one round trip.
use crate::config::PasswordRequirements;

/// Validate registration input. Returns an empty list when it is acceptable.
pub fn validate_registration(
    username: &str,
    password: &str,
    requirements: &PasswordRequirements,
) -> Vec<String> {
    let mut violations = validate_username(username, requirements);
    violations.extend(validate_password(password, requirements));
    violations
}

pub fn validate_username(username: &str, requirements: &PasswordRequirements) -> Vec<String> {
    if username.trim().is_empty() {
        return vec!["Username is required.".to_string()];
    }

    let mut violations = Vec::new();
    if username.chars().count() < requirements.username_min_length {
        violations.push(format!(
            "Username must be at least {} characters long.",
            requirements.username_min_length
        ));
    }
    if username.chars().any(char::is_whitespace) {
        violations.push("Username cannot contain spaces.".to_string());
    }
    violations
}

pub fn validate_password(password: &str, requirements: &PasswordRequirements) -> Vec<String> {
    if password.trim().is_empty() {
        return vec!["Password is required.".to_string()];
    }

    let mut violations = Vec::new();
    if password.chars().count() < requirements.min_length {
        violations.push(format!(
            "Password must be at least {} characters long.",
            requirements.min_length
        ));
    }

    let missing_class = [
        (requirements.require_uppercase, password.chars().any(|c| c.is_ascii_uppercase())),
        (requirements.require_lowercase, password.chars().any(|c| c.is_ascii_lowercase())),
        (requirements.require_digit, password.chars().any(|c| c.is_ascii_digit())),
        (requirements.require_special, password.chars().any(|c| !c.is_ascii_alphanumeric())),
    ]
    .into_iter()
    .any(|(required, present)| required && !present);

    if missing_class {
        violations.push(composite_rule(requirements));
    }
    violations
}

/// The single message describing every enabled character-class rule
fn composite_rule(requirements: &PasswordRequirements) -> String {
    let classes: Vec<&str> = [
        (requirements.require_uppercase, "one uppercase letter"),
        (requirements.require_lowercase, "one lowercase letter"),
        (requirements.require_digit, "one number"),
        (requirements.require_special, "one special character"),
    ]
    .into_iter()
    .filter_map(|(required, class)| required.then_some(class))
    .collect();

    let list = match classes.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    };
    format!("Password must include at least {list}.")
}
