//! HS256 JWT による CredentialVerifier 実装
//!
//! トークンのペイロードは `email`（ユーザーの Identity）と `exp` を持つ。

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::{CredentialError, CredentialVerifier, Identity};

/// トークンのクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// 共有シークレットで署名・検証する JWT 実装
pub struct JwtCredentialVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// 指定した Identity 向けのトークンを発行
    ///
    /// `ttl` が負の場合は期限切れのトークンになる。
    pub fn issue_token(&self, identity: &Identity, ttl: Duration) -> Result<String, CredentialError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            email: identity.as_str().to_string(),
            iat: now,
            exp: now + ttl.num_seconds(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::Invalid(e.to_string()))
    }
}

impl CredentialVerifier for JwtCredentialVerifier {
    fn verify(&self, token: &str) -> Result<Identity, CredentialError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => CredentialError::Expired,
                    _ => CredentialError::Invalid(e.to_string()),
                }
            })?;

        Identity::new(token_data.claims.email).map_err(|e| CredentialError::Invalid(e.to_string()))
    }
}
