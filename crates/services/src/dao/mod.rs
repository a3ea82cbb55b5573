pub mod base;
pub mod comment;
pub mod folder;
pub mod invite;
pub mod notification;
pub mod user;
pub mod video;
pub mod workspace;

pub use base::BaseDao;
