//! Hook outcome conversion.

use crate::error::BoxError;

/// Trait for converting a hook closure's return value into an outcome.
///
/// # Default Implementations
///
/// - `()` → success
/// - `Result<(), E>` → success or the boxed error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid hook outcome",
    label = "hooks must return `()` or `Result<(), E>`",
    note = "Implement `IntoHookOutcome` to return custom types from hooks."
)]
pub trait IntoHookOutcome {
    /// Convert the output into success or a hook error.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl IntoHookOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoHookOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}
