//! Authentication: password hashing, bearer tokens, the request extractor and
//! the ownership rule shared by every owned resource.

pub mod extractor;
pub mod models;
pub mod ownership;
pub mod password;
pub mod service;
pub mod token;

pub use extractor::AuthUser;
pub use models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use ownership::{ensure_owner, Action, Owned};
pub use token::Claims;
