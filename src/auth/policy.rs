//! Access policy for the user endpoints.
//!
//! Pure, total decision functions over in-memory values; no I/O and no
//! state. The endpoints map a `false` here to 403 once a user is
//! resolved, never back to 401.

use super::CurrentUser;

/// Whether `user` may update the user record `target_id`.
///
/// Any authenticated user may update any record; there is no ownership
/// or role gate on update. This mirrors the existing behavior and is a
/// probable gap (delete does check ownership) -- see DESIGN.md.
pub fn can_update(_user: &CurrentUser, _target_id: i64) -> bool {
    true
}

/// Whether `user` may delete the user record `target_id`: owners and
/// admins only.
pub fn can_delete(user: &CurrentUser, target_id: i64) -> bool {
    user.id == target_id || user.is_admin()
}

/// Whether `user` may fetch their own profile.
pub fn can_view_self(_user: &CurrentUser) -> bool {
    true
}
