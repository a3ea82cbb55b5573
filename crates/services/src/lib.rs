pub mod auth;
pub mod dao;
pub mod invite;
pub mod mail;

pub use auth::AuthService;
pub use dao::*;
pub use invite::{InviteError, InviteService};
pub use mail::Mailer;
