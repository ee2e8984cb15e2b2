//! Configuration constants for refract elements
//!
//! Centralized values used throughout the crate for:
//! - Recursion depth limits (prevent stack overflow on hostile input)
//! - Names of the always-present fallback element class

/// Maximum nesting depth when decoding a refract value.
///
/// Every nested element (content, member key/value, refracted attribute)
/// counts as one level. Each level costs several decoder frames, so the
/// limit has to stay well inside a 2 MiB thread stack in debug builds.
pub const MAX_REFRACT_DEPTH: usize = 64;

/// Wire name of the fallback element class.
pub const BASE_ELEMENT_NAME: &str = "element";

/// Display name of the fallback element class in [`crate::Namespace::elements`].
pub const BASE_ELEMENT_DISPLAY_NAME: &str = "BaseElement";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_reasonable() {
        assert!(MAX_REFRACT_DEPTH >= 20, "Should allow realistic nesting");
        assert!(MAX_REFRACT_DEPTH <= 100, "Should stay well below stack limits");
    }

    #[test]
    fn test_display_name_is_pascal_case() {
        assert!(BASE_ELEMENT_DISPLAY_NAME
            .chars()
            .next()
            .is_some_and(char::is_uppercase));
    }
}
