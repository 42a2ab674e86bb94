mod admin;
mod deck;

pub use admin::{
    admin_login, admin_logout, create_joke, delete_joke, error_message, is_admin, list_jokes,
    update_joke, AdminDashboardPage, AdminLoginFn, AdminLoginPage, AdminLogoutFn, CreateJokeFn,
    DeleteJokeFn, IsAdminFn, ListJokesFn, UpdateJokeFn,
};
pub use deck::{get_jokes, vote_joke, DeckPage, GetJokesFn, VoteJokeFn};
