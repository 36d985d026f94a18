//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities. Identifiers are integers
//! assigned by the database, so there is no `new()` constructor; an `Id`
//! only exists once the row does.

use std::fmt;
use std::marker::PhantomData;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::Id;
/// struct UserMarker;
/// type UserId = Id<UserMarker>;
/// let id = UserId::from_i64(42);
/// assert_eq!(id.as_i64(), 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Wrap an existing database-assigned identifier
    pub const fn from_i64(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the underlying integer
    pub const fn as_i64(&self) -> i64 {
        self.value
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AMarker;
    struct BMarker;
    type AId = Id<AMarker>;
    type BId = Id<BMarker>;

    #[test]
    fn test_id_type_safety() {
        let a: AId = Id::from_i64(1);
        let b: BId = Id::from_i64(1);

        // These are different types, cannot be mixed
        let _a: i64 = a.into();
        let _b: i64 = b.into();
    }

    #[test]
    fn test_id_roundtrip() {
        let id: AId = Id::from_i64(7);
        assert_eq!(id.as_i64(), 7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(format!("{:?}", id), "Id(7)");
    }
}
