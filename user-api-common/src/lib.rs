//! Users API Common Types
//!
//! Shared types used by the HTTP layer and the user store.

pub mod request;
pub mod user;

pub use request::{
    CreateUserRequest, NewUser, UpdateUserRequest, UserField, UserPatch, ValidationError,
};
pub use user::{InvalidUserId, User, UserId};
