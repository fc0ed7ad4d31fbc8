/// Authentication and authorization utilities
///
/// - `jwt`: Access/refresh token creation and validation (HS256)
/// - `password`: Argon2id password hashing
/// - `middleware`: Request auth context types
/// - `authorization`: Pure permission predicates over domain entities

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
