use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Decodes and validates an access token. Refresh tokens are refused here;
/// they are only good for minting new access tokens.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("Refresh token cannot be used for API access".to_string());
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token(token_type: TokenType, exp_offset: i64, secret: &str) -> String {
        let claims = Claims {
            user_id: 1,
            sub: "avery".to_string(),
            role: 3,
            exp: (chrono::Utc::now().timestamp() + exp_offset) as usize,
            jti: "jti-1".to_string(),
            token_type,
            employee_id: Some(1000),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_valid_access_token() {
        let claims = verify_token(&token(TokenType::Access, 600, SECRET), SECRET).unwrap();
        assert_eq!(claims.employee_id, Some(1000));
        assert_eq!(claims.sub, "avery");
    }

    #[test]
    fn rejects_refresh_expired_and_foreign_tokens() {
        assert!(verify_token(&token(TokenType::Refresh, 600, SECRET), SECRET).is_err());
        assert!(verify_token(&token(TokenType::Access, -600, SECRET), SECRET).is_err());
        assert!(verify_token(&token(TokenType::Access, 600, "other"), SECRET).is_err());
    }
}
