//! [`Session`] definitions.

use common::{unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Deserializer, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Authenticated session of a [`User`], as seen by this client.
#[derive(Clone, Debug)]
pub struct Session {
    /// Access [`Token`] of this [`Session`].
    pub token: Token,

    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: ExpirationDateTime,

    /// Decoded [`Claims`] of the [`Token`].
    pub claims: Claims,
}

impl Session {
    /// Decodes a [`Session`] out of the provided [`Token`].
    ///
    /// The signature is not verified: only the server holds the key, so the
    /// client only reads the subject and the expiration.
    ///
    /// # Errors
    ///
    /// If the [`Token`] is not a well-formed JSON Web Token or lacks the
    /// `sub`/`exp` claims.
    pub fn decode(token: Token) -> Result<Self, DecodeError> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = jsonwebtoken::decode::<Claims>(
            token.as_ref(),
            &DecodingKey::from_secret(&[]),
            &validation,
        )?
        .claims;

        Ok(Self {
            user_id: claims.sub,
            expires_at: claims.expires_at,
            claims,
            token,
        })
    }

    /// Indicates whether this [`Session`] is still valid at the provided
    /// moment.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime) -> bool {
        self.expires_at > now.coerce()
    }
}

/// Claims carried by a [`Session`] [`Token`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    /// ID of the [`User`] the [`Token`] was issued to.
    #[serde(deserialize_with = "deserialize_subject")]
    pub sub: user::Id,

    /// [`DateTime`] when the [`Token`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,

    /// Any other claims issued by the server.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Access token of a [`Session`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Token(String);

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

/// Error of decoding a [`Session`] out of a [`Token`].
#[derive(Debug, Display, Error, From)]
#[display("Malformed session token: {_0}")]
pub struct DecodeError(jsonwebtoken::errors::Error);

/// Deserializes a [`user::Id`] issued either as a JSON number or as a string.
fn deserialize_subject<'de, D>(deserializer: D) -> Result<user::Id, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Number(i64),
        Text(String),
    }

    match Subject::deserialize(deserializer)? {
        Subject::Number(n) => Ok(n.into()),
        Subject::Text(s) => s.parse().map_err(D::Error::custom),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use common::DateTime;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::{Session, Token};

    /// Issues a signed [`Token`] for the provided subject expiring at `exp`.
    pub(crate) fn token(sub: serde_json::Value, exp: DateTime) -> Token {
        jsonwebtoken::encode(
            &Header::default(),
            &json!({ "sub": sub, "exp": exp.unix_timestamp(), "role": "user" }),
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn decodes_without_knowing_the_key() {
        let exp = DateTime::now() + Duration::from_secs(3600);
        let session = Session::decode(token(json!(7), exp)).unwrap();

        assert_eq!(i64::from(session.user_id), 7);
        assert_eq!(session.expires_at.unix_timestamp(), exp.unix_timestamp());
        assert_eq!(session.claims.extra.get("role"), Some(&json!("user")));
        assert!(session.is_valid_at(DateTime::now()));
    }

    #[test]
    fn accepts_string_subjects() {
        let exp = DateTime::now() + Duration::from_secs(60);
        let session = Session::decode(token(json!("12"), exp)).unwrap();

        assert_eq!(i64::from(session.user_id), 12);
    }

    #[test]
    fn expired_session_is_invalid() {
        let exp = DateTime::now() - Duration::from_secs(1);
        let session = Session::decode(token(json!(7), exp)).unwrap();

        assert!(!session.is_valid_at(DateTime::now()));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Session::decode(Token::from("not-a-jwt".to_owned())).is_err());
        assert!(Session::decode(Token::from("a.b.c".to_owned())).is_err());
    }
}
