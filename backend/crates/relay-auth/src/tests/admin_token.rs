use crate::{AdminTokenValidator, AuthError};

#[test]
fn given_matching_token_when_validate_then_ok() {
    let validator = AdminTokenValidator::new("s3cret-token");

    assert!(validator.validate(Some("s3cret-token")).is_ok());
}

#[test]
fn given_wrong_token_when_validate_then_invalid_token() {
    let validator = AdminTokenValidator::new("s3cret-token");

    let result = validator.validate(Some("s3cret-tokeN"));

    assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
}

#[test]
fn given_token_prefix_when_validate_then_invalid_token() {
    let validator = AdminTokenValidator::new("s3cret-token");

    let result = validator.validate(Some("s3cret"));

    assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
}

#[test]
fn given_missing_header_when_validate_then_missing_token() {
    let validator = AdminTokenValidator::new("s3cret-token");

    let result = validator.validate(None);

    assert!(matches!(result, Err(AuthError::MissingToken { .. })));
}

#[test]
fn given_empty_header_when_validate_then_missing_token() {
    let validator = AdminTokenValidator::new("s3cret-token");

    let result = validator.validate(Some(""));

    assert!(matches!(result, Err(AuthError::MissingToken { .. })));
}

#[test]
fn given_empty_expected_token_when_validate_then_nothing_matches() {
    let validator = AdminTokenValidator::new("");

    assert!(validator.validate(Some("anything")).is_err());
    assert!(validator.validate(Some("")).is_err());
}

#[test]
fn given_validator_when_debug_formatted_then_secret_hidden() {
    let validator = AdminTokenValidator::new("s3cret-token");

    let rendered = format!("{:?}", validator);

    assert!(!rendered.contains("s3cret-token"));
}
