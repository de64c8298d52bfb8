use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeZone, Utc};
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

/// Reads the claims of an access token without checking its signature.
///
/// The signing secret only exists server-side; the client uses the claims for
/// diagnostics (who is logged in, whether the token already expired).
pub fn decode_claims(token: &str) -> Result<JwtClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    serde_json::from_str(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        "Invalid claims format".to_string()
    })
}

pub fn is_expired(claims: &JwtClaims) -> bool {
    match claims.exp {
        Some(exp) => {
            let now = Utc::now().timestamp().max(0) as u64;
            exp < now
        }
        None => false,
    }
}

pub fn user_from_claims(claims: JwtClaims) -> User {
    let created_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        created_at,
    }
}
