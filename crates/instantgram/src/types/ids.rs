//! Backend entity identifiers.
//!
//! The backend issues UUIDs, but the client treats ids as opaque strings and
//! only checks that they are safe to place in a URL path segment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

fn validate(kind: &'static str, s: &str) -> Result<(), Error> {
    let reason = if s.is_empty() {
        "must not be empty"
    } else if s.chars().any(char::is_whitespace) {
        "must not contain whitespace"
    } else if s.contains(['/', '?', '#']) {
        "must not contain '/', '?' or '#'"
    } else {
        return Ok(());
    };

    Err(InvalidInputError::Id {
        kind,
        value: s.to_string(),
        reason: reason.to_string(),
    }
    .into())
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new id, validating that it is path-safe.
            pub fn new(s: impl Into<String>) -> Result<Self, Error> {
                let s = s.into();
                validate($kind, &s)?;
                Ok(Self(s))
            }

            /// Returns the id string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a user account; also the parent id of the user's avatar.
    UserId,
    "user id"
);
entity_id!(
    /// Identifier of a post.
    PostId,
    "post id"
);
entity_id!(
    /// Identifier of a comment.
    CommentId,
    "comment id"
);
entity_id!(
    /// Identifier of a chat.
    ChatId,
    "chat id"
);
entity_id!(
    /// Identifier of a chat message.
    MessageId,
    "message id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid() {
        let id = UserId::new("3f2b8c4e-5d6a-4b7c-8d9e-0f1a2b3c4d5e").unwrap();
        assert_eq!(id.as_str(), "3f2b8c4e-5d6a-4b7c-8d9e-0f1a2b3c4d5e");
    }

    #[test]
    fn rejects_path_breaking_input() {
        assert!(PostId::new("").is_err());
        assert!(PostId::new("a/b").is_err());
        assert!(PostId::new("a?b").is_err());
        assert!(ChatId::new("a b").is_err());
    }

    #[test]
    fn error_names_the_kind() {
        let err = ChatId::new("").unwrap_err().to_string();
        assert!(err.contains("chat id"));
    }

    #[test]
    fn deserialization_validates() {
        let id: UserId = serde_json::from_str("\"u1\"").unwrap();
        assert_eq!(id.to_string(), "u1");
        assert!(serde_json::from_str::<UserId>("\"u/1\"").is_err());
    }
}
