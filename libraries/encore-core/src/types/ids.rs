/// ID types for account-data entities
///
/// The account-data API assigns integer identities; these newtypes keep a
/// favorite id from being passed where a category id is expected.
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! server_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a server-assigned id
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner value
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

server_id!(
    /// Favorite identifier (server-assigned)
    FavoriteId
);

server_id!(
    /// Favorite category identifier (server-assigned)
    CategoryId
);

server_id!(
    /// Search history entry identifier (server-assigned)
    SearchEntryId
);
