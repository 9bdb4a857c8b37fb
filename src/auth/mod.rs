//! User accounts, password hashing and cookie based sessions.
//!
//! Protected routes sit behind [auth_guard], which makes the logged in
//! [UserID] available to handlers as a request extension.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register;
mod token;
mod user;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{get_register_page, register_user};
pub(super) use token::Token;
pub use user::{User, UserID, create_user, create_user_table, get_user_by_username};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;
