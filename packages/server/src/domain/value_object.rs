//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use chrono::{DateTime, Utc};
use hiroba_shared::time::{now_utc, parse_iso8601, to_iso8601};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a username.
pub const USERNAME_MAX_LEN: usize = 100;

/// Maximum length of a message text.
pub const MESSAGE_TEXT_MAX_LEN: usize = 10000;

/// Authenticated identity of a chat user.
///
/// Immutable once created. Messages are always attributed to the identity bound
/// to the connection, never to an author claimed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create a new Username.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, has leading or trailing
    /// whitespace, or is longer than [`USERNAME_MAX_LEN`].
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::UsernameEmpty);
        }
        if trimmed.len() != name.len() {
            return Err(ValueObjectError::UsernameSurroundingWhitespace);
        }
        let len = name.chars().count();
        if len > USERNAME_MAX_LEN {
            return Err(ValueObjectError::UsernameTooLong {
                max: USERNAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text body of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty or longer than [`MESSAGE_TEXT_MAX_LEN`].
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        if text.is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let len = text.chars().count();
        if len > MESSAGE_TEXT_MAX_LEN {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageText> for String {
    fn from(value: MessageText) -> Self {
        value.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned point in time (UTC).
///
/// Serialized as ISO 8601 with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Current server time.
    pub fn now() -> Self {
        Self(now_utc())
    }

    /// Parse an ISO 8601 string.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::TimestampInvalidFormat` if the string is not RFC 3339.
    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        parse_iso8601(value)
            .map(Self)
            .map_err(|_| ValueObjectError::TimestampInvalidFormat(value.to_string()))
    }

    /// Get the inner value.
    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    /// ISO 8601 representation, e.g. `2024-01-01T00:00:00.000Z`.
    pub fn to_iso8601(&self) -> String {
        to_iso8601(&self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Opaque handle of one live connection.
///
/// The same user may hold several connections; each gets its own handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a ConnectionId from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_username_new_success() {
        // テスト項目: 有効なユーザー名を作成できる
        // given (前提条件):
        let name = "alice".to_string();

        // when (操作):
        let result = Username::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_username_new_empty_fails() {
        // テスト項目: 空（空白のみ含む）のユーザー名は作成できない
        assert_eq!(
            Username::new("".to_string()).unwrap_err(),
            ValueObjectError::UsernameEmpty
        );
        assert_eq!(
            Username::new("   ".to_string()).unwrap_err(),
            ValueObjectError::UsernameEmpty
        );
    }

    #[test]
    fn test_username_new_surrounding_whitespace_fails() {
        // テスト項目: 前後に空白を含むユーザー名は作成できない
        for name in [" alice", "alice ", "\talice\n"] {
            assert_eq!(
                Username::new(name.to_string()).unwrap_err(),
                ValueObjectError::UsernameSurroundingWhitespace,
                "{:?}",
                name
            );
        }
        // 内側の空白は許可される
        assert!(Username::new("alice smith".to_string()).is_ok());
    }

    #[test]
    fn test_username_new_too_long_fails() {
        // テスト項目: 101 文字以上のユーザー名は作成できない
        // given (前提条件):
        let name = "a".repeat(101);

        // when (操作):
        let result = Username::new(name);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::UsernameTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_username_equality() {
        // テスト項目: 同じ値を持つ Username は等価
        let id1 = Username::new("alice".to_string()).unwrap();
        let id2 = Username::new("alice".to_string()).unwrap();
        let id3 = Username::new("bob".to_string()).unwrap();

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_message_text_new_empty_fails() {
        // テスト項目: 空のメッセージは作成できない
        assert_eq!(
            MessageText::new("".to_string()).unwrap_err(),
            ValueObjectError::MessageTextEmpty
        );
    }

    #[test]
    fn test_message_text_counts_characters_not_bytes() {
        // テスト項目: 文字数上限はバイト数ではなく文字数で判定される
        // given (前提条件): 10000 文字のマルチバイト文字列
        let text = "あ".repeat(10000);

        // when (操作):
        let result = MessageText::new(text);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            MessageText::new("あ".repeat(10001)).unwrap_err(),
            ValueObjectError::MessageTextTooLong {
                max: 10000,
                actual: 10001
            }
        );
    }

    #[test]
    fn test_timestamp_serializes_as_iso8601() {
        // テスト項目: Timestamp は ISO 8601 文字列としてシリアライズされる
        // given (前提条件):
        let ts = Timestamp::new(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());

        // when (操作):
        let json = serde_json::to_string(&ts).unwrap();

        // then (期待する結果):
        assert_eq!(json, "\"2024-05-06T07:08:09.000Z\"");
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn test_timestamp_parse_invalid() {
        // テスト項目: 不正な文字列は Timestamp にできない
        assert_eq!(
            Timestamp::parse("not-a-time").unwrap_err(),
            ValueObjectError::TimestampInvalidFormat("not-a-time".to_string())
        );
    }

    #[test]
    fn test_username_deserialize_validates() {
        // テスト項目: デシリアライズ時にもバリデーションが走る
        let result: Result<Username, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
