pub mod admin_routes;
pub mod paths;
pub mod tag_routes;
pub mod user_routes;
