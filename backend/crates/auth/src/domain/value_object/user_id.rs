use kernel::id::Id;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct UserMarker;
pub type UserId = Id<UserMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let user_id = UserId::from_i64(17);
        assert_eq!(user_id.as_i64(), 17);
        assert_eq!(user_id.to_string(), "17");
    }
}
