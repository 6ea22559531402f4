use garde::Validate;
use kernel::model::{auth::LoginSession, id::UserId, role::Role, user::event::CreateUser};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[garde(length(chars, min = 1, max = 100))]
    first_name: String,
    #[garde(length(chars, min = 1, max = 100))]
    last_name: String,
    #[garde(email, length(max = 255))]
    email: String,
    #[garde(length(chars, min = 1, max = 100))]
    username: String,
    #[garde(length(min = 8))]
    password: String,
}

impl From<RegisterRequest> for CreateUser {
    fn from(value: RegisterRequest) -> Self {
        let RegisterRequest {
            first_name,
            last_name,
            email,
            username,
            password,
        } = value;
        Self {
            first_name,
            last_name,
            email,
            username,
            password,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub user_id: UserId,
    pub role: Role,
}

impl From<LoginSession> for AccessTokenResponse {
    fn from(value: LoginSession) -> Self {
        let LoginSession {
            access_token,
            user_id,
            role,
        } = value;
        Self {
            access_token: access_token.0,
            user_id,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Aiko",
            "lastName": "Tanaka",
            "email": "aiko@example.com",
            "username": "aiko",
            "password": "short"
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn well_formed_registration_passes() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Aiko",
            "lastName": "Tanaka",
            "email": "aiko@example.com",
            "username": "aiko",
            "password": "long enough"
        }))
        .unwrap();
        assert!(req.validate(&()).is_ok());
    }

    fn registration(first_name: &str, email: &str, username: &str) -> RegisterRequest {
        serde_json::from_value(serde_json::json!({
            "firstName": first_name,
            "lastName": "Tanaka",
            "email": email,
            "username": username,
            "password": "long enough"
        }))
        .unwrap()
    }

    #[test]
    fn names_are_limited_to_100_characters() {
        // 文字数で数えるので、マルチバイト 100 文字は通る
        let name = "あ".repeat(100);
        assert!(registration(&name, "aiko@example.com", &name).validate(&()).is_ok());

        let long = "a".repeat(101);
        assert!(registration(&long, "aiko@example.com", "aiko").validate(&()).is_err());
        assert!(registration("Aiko", "aiko@example.com", &long).validate(&()).is_err());
    }

    #[test]
    fn email_is_limited_to_255_bytes() {
        // ローカル部は 64 文字まで
        let domain = format!("{}.{}.{}.com", "a".repeat(63), "b".repeat(63), "c".repeat(63));
        let fits = format!("{}@{}", "x".repeat(255 - domain.len() - 1), domain);
        assert_eq!(fits.len(), 255);
        assert!(registration("Aiko", &fits, "aiko").validate(&()).is_ok());

        let too_long = format!("x{fits}");
        assert!(registration("Aiko", &too_long, "aiko").validate(&()).is_err());
    }
}
