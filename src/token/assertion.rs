//! RS512-signed JWT client assertions for the client-credentials grant.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{_prelude::*, config::OAuthConfig, error::SigningError};

/// Assertion type sent alongside the signed JWT.
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";
/// Scopes requested for every token.
pub const SCOPE: &str = "restlets,rest_webservices";
/// Signature algorithm required by NetSuite for certificate-based assertions.
pub const ALGORITHM: Algorithm = Algorithm::RS512;

/// Claims carried by a client assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Token endpoint URL.
	pub aud: String,
	/// Integration client ID.
	pub iss: String,
	/// Comma-separated scopes.
	pub scope: String,
	/// Issued-at, Unix seconds.
	pub iat: i64,
	/// Expiry, Unix seconds; NetSuite caps it at `iat + 3600`.
	pub exp: i64,
}
impl AssertionClaims {
	/// Builds the claims for `config` issued at `issued_at`.
	pub fn new(config: &OAuthConfig, issued_at: OffsetDateTime) -> Result<Self, SigningError> {
		let iat = issued_at.unix_timestamp();
		let seconds = config.token_expiration.whole_seconds();
		let exp = iat.checked_add(seconds).ok_or(SigningError::Lifetime { seconds })?;

		Ok(Self {
			aud: config.token_endpoint.to_string(),
			iss: config.client_id.clone(),
			scope: SCOPE.into(),
			iat,
			exp,
		})
	}
}

/// Signs a client assertion for `config` issued at `issued_at`.
///
/// The JWT header carries `kid = certificate_id` so NetSuite can pick the matching public
/// certificate.
pub fn sign(config: &OAuthConfig, issued_at: OffsetDateTime) -> Result<String, SigningError> {
	let key = EncodingKey::from_rsa_pem(config.certificate_private_key().expose().as_bytes())
		.map_err(SigningError::InvalidKey)?;
	let mut header = Header::new(ALGORITHM);

	header.kid = Some(config.certificate_id.clone());

	let claims = AssertionClaims::new(config, issued_at)?;

	jsonwebtoken::encode(&header, &claims, &key).map_err(SigningError::Encode)
}
