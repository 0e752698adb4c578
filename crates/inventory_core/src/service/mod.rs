//! Use-case services over repository traits.

pub mod class_service;
pub mod domain_service;
pub mod element_service;
pub mod tag_reconcile;

use crate::error::{InventoryError, InventoryResult};
use log::warn;

/// Fails with `Conflict` when the caller pinned a version that is not the
/// stored one.
pub(crate) fn check_version(id: &str, expected: Option<i64>, actual: i64) -> InventoryResult<()> {
    match expected {
        Some(expected) if expected != actual => Err(InventoryError::Conflict {
            id: id.to_string(),
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}

/// Logs a rejected use-case call with its code only.
pub(crate) fn log_rejection(event: &str, err: &InventoryError) {
    warn!(
        "event={} module=service status=error code={} kind={}",
        event,
        err.code(),
        err.kind()
    );
}

#[cfg(test)]
mod tests {
    use super::check_version;
    use crate::error::InventoryError;

    #[test]
    fn absent_expected_version_always_passes() {
        assert!(check_version("d1", None, 7).is_ok());
        assert!(check_version("d1", Some(7), 7).is_ok());
    }

    #[test]
    fn mismatched_expected_version_conflicts() {
        let err = check_version("d1", Some(2), 3).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Conflict { expected: 2, actual: 3, .. }
        ));
    }
}
