//! Keys used in durable client storage.

/// Spotify access token obtained from the login handshake
pub const ACCESS_TOKEN: &str = "access_token";

/// Spotify refresh token
pub const REFRESH_TOKEN: &str = "refresh_token";

/// JWT issued by the account-data API
pub const JWT_TOKEN: &str = "jwt_token";

/// Serialized `AuthenticatedUser`
pub const USER: &str = "User";

/// Admin flag written by the login handshake
pub const IS_ADMIN: &str = "IsAdmin";

/// Persisted theme flag
pub const DARK_MODE: &str = "dark_mode";

/// Every key that holds identity or credentials. Cleared on logout.
pub const SESSION_KEYS: [&str; 5] = [JWT_TOKEN, ACCESS_TOKEN, REFRESH_TOKEN, IS_ADMIN, USER];
