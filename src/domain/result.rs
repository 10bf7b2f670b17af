//! Result type alias for esmigrate
//!
//! This module provides a convenient Result type alias that uses
//! [`MigrateError`] as the error type.

use super::errors::MigrateError;

/// Result type alias for esmigrate operations
///
/// # Examples
///
/// ```
/// use esmigrate::domain::result::Result;
/// use esmigrate::domain::errors::MigrateError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MigrateError::Configuration("index is required".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<usize> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(MigrateError::Other("boom".to_string()));
        assert!(result.is_err());
    }
}
