//! Error types for proximity queries.

use thiserror::Error;

/// Result type alias for proximity operations.
pub type ProximityResult<T> = Result<T, ProximityError>;

/// Errors that can occur while building a closest-point index.
///
/// A query that finds nothing within its radius is not an error; it is the
/// ordinary `None` return of [`ClosestPointQuery::closest_point`].
///
/// [`ClosestPointQuery::closest_point`]: crate::ClosestPointQuery::closest_point
#[derive(Debug, Error)]
pub enum ProximityError {
    /// The triangle set is empty; there is no surface to query.
    #[error("triangle set is empty")]
    EmptyMesh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProximityError::EmptyMesh;
        assert!(format!("{err}").contains("empty"));
    }
}
