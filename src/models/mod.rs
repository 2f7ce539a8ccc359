// Tuiter document models - JSON shapes stored in and returned from each collection

pub mod follow;
pub mod like;
pub mod message;
pub mod reference;
pub mod tuit;
pub mod user;

pub use follow::Follow;
pub use like::Like;
pub use message::{Message, MessageContent};
pub use reference::Ref;
pub use tuit::{AuthoredTuit, Stats, Tuit, TuitContent, TuitPatch};
pub use user::{
    AccountType, Bookmarks, Credentials, Location, MaritalStatus, User, UserPatch, UserProfile,
};
