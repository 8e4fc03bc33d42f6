//! Name validation for context entries, parameters, members and path segments.

use crate::diagnostics::{CompileResult, Diagnostic, INVALID_NAME, RESERVED_NAME};

/// Name of the entry holding a block's result.
pub const RETURN: &str = "_return";

/// Name of the enclosing class instance.
pub const SELF: &str = "self";

/// Prefix of the names generated for anonymous intermediate values.
pub const ANONYMOUS_PREFIX: &str = "_anon_";

/// Names a user may not bind.
const RESERVED: &[&str] = &[RETURN, SELF];

/// Returns true if `name` is a syntactically valid segment.
pub fn is_valid_segment(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validates a path segment such as a method name in `$self/current`.
pub fn validate_segment(name: &str) -> CompileResult<()> {
    if is_valid_segment(name) {
        Ok(())
    } else {
        Err(Box::new(
            Diagnostic::make_error(&INVALID_NAME, &[name]).with_reference(name),
        ))
    }
}

/// Validates a name the user binds: a context entry, a parameter, a field or a method.
pub fn validate_name(name: &str) -> CompileResult<()> {
    validate_segment(name)?;

    if RESERVED.contains(&name) || name.starts_with(ANONYMOUS_PREFIX) {
        return Err(Box::new(
            Diagnostic::make_error(&RESERVED_NAME, &[name]).with_reference(name),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers() {
        assert!(validate_name("version").is_ok());
        assert!(validate_name("_configure").is_ok());
        assert!(validate_name("copy-from").is_ok());
        assert!(validate_name("v2").is_ok());
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", "2x", "$x", "a/b", "a b"] {
            let err = validate_name(name).unwrap_err();
            assert_eq!(err.code(), Some("E010"), "{name}");
        }
    }

    #[test]
    fn rejects_reserved_names() {
        assert_eq!(validate_name("self").unwrap_err().code(), Some("E011"));
        assert_eq!(validate_name("_return").unwrap_err().code(), Some("E011"));
        assert_eq!(validate_name("_anon_0").unwrap_err().code(), Some("E011"));
        assert!(validate_name("_anonymous").is_ok());
        assert!(validate_segment("self").is_ok());
    }
}
