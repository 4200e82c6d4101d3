//! Password hashing, bearer-token issuance and the authenticated-user
//! extractor used by every protected route.

mod extractor;
pub mod password;
pub mod token;

pub use extractor::AuthUser;
pub use token::TokenKeys;
