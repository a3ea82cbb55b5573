pub mod comment;
pub mod folder;
pub mod invite;
pub mod member;
pub mod notification;
pub mod user;
pub mod video;
pub mod workspace;

pub use comment::*;
pub use folder::*;
pub use invite::*;
pub use member::*;
pub use notification::*;
pub use user::*;
pub use video::*;
pub use workspace::*;
