use crate::models::User;

/// Whether `actor` may update or delete a record created by `owner_id`.
///
/// Creators can always change their own records. Admins can change anything.
#[must_use]
pub const fn can_modify(actor: &User, owner_id: i32) -> bool {
    actor.id == owner_id || actor.is_admin()
}
