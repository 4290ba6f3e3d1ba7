//! Public URL paths, shared by the router and the tests.

pub const HEALTH: &str = "/health";

pub const USER_CREATE: &str = "/user/create/";
pub const USER_TOKEN: &str = "/user/token/";
pub const USER_ME: &str = "/user/me/";

pub const TAGS: &str = "/tags/";

pub const ADMIN_USER_CHANGELIST: &str = "/admin/core/user/";
pub const ADMIN_USER_ADD: &str = "/admin/core/user/add/";
pub const ADMIN_USER_CHANGE: &str = "/admin/core/user/{user_id}/change/";

pub fn admin_user_change(user_id: i32) -> String {
    format!("/admin/core/user/{user_id}/change/")
}
