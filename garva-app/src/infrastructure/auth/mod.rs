mod admin;

pub use admin::{AdminAuth, ADMIN_SESSION_KEY};
