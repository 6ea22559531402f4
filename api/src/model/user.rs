use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{
        event::{UpdateProfile, UpdateUserRole},
        ListingOwner, User,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub items: Vec<UserResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub firebase_uid: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            first_name,
            last_name,
            email,
            username,
            role,
            firebase_uid,
            avatar,
            phone,
            created_at,
        } = value;
        Self {
            user_id,
            first_name,
            last_name,
            email,
            username,
            role,
            firebase_uid,
            avatar,
            phone,
            created_at,
        }
    }
}

/// Firebase UID から引いたときに返す最小限の情報
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLookupResponse {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
}

impl From<User> for UserLookupResponse {
    fn from(value: User) -> Self {
        Self {
            display_name: value.display_name(),
            user_id: value.user_id,
            role: value.role,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[garde(length(chars, min = 1, max = 100))]
    first_name: Option<String>,
    #[garde(length(chars, min = 1, max = 100))]
    last_name: Option<String>,
    #[garde(length(max = 32))]
    phone: Option<String>,
    #[garde(skip)]
    avatar: Option<String>,
    #[garde(length(min = 1, max = 128))]
    firebase_uid: Option<String>,
}

#[derive(new)]
pub struct UpdateProfileRequestWithUserId(UserId, UpdateProfileRequest);
impl From<UpdateProfileRequestWithUserId> for UpdateProfile {
    fn from(value: UpdateProfileRequestWithUserId) -> Self {
        let UpdateProfileRequestWithUserId(
            user_id,
            UpdateProfileRequest {
                first_name,
                last_name,
                phone,
                avatar,
                firebase_uid,
            },
        ) = value;
        UpdateProfile {
            user_id,
            first_name,
            last_name,
            phone,
            avatar,
            firebase_uid,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    role: Role,
}

#[derive(new)]
pub struct UpdateUserRoleRequestWithUserId(UserId, UpdateUserRoleRequest);
impl From<UpdateUserRoleRequestWithUserId> for UpdateUserRole {
    fn from(value: UpdateUserRoleRequestWithUserId) -> Self {
        let UpdateUserRoleRequestWithUserId(user_id, UpdateUserRoleRequest { role }) = value;
        Self { user_id, role }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingOwnerResponse {
    pub owner_id: UserId,
    pub owner_name: String,
}

impl From<ListingOwner> for ListingOwnerResponse {
    fn from(value: ListingOwner) -> Self {
        let ListingOwner {
            owner_id,
            owner_name,
        } = value;
        Self {
            owner_id,
            owner_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(value: serde_json::Value) -> UpdateProfileRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_profile_update_is_valid() {
        assert!(profile(serde_json::json!({})).validate(&()).is_ok());
    }

    #[test]
    fn profile_names_are_limited_to_100_characters() {
        let ok = profile(serde_json::json!({ "firstName": "a".repeat(100), "lastName": "b" }));
        assert!(ok.validate(&()).is_ok());

        let first = profile(serde_json::json!({ "firstName": "a".repeat(101) }));
        assert!(first.validate(&()).is_err());
        let last = profile(serde_json::json!({ "lastName": "b".repeat(101) }));
        assert!(last.validate(&()).is_err());
        let empty = profile(serde_json::json!({ "lastName": "" }));
        assert!(empty.validate(&()).is_err());
    }

    #[test]
    fn firebase_uid_is_limited_to_128_characters() {
        let ok = profile(serde_json::json!({ "firebaseUid": "u".repeat(128) }));
        assert!(ok.validate(&()).is_ok());

        let long = profile(serde_json::json!({ "firebaseUid": "u".repeat(129) }));
        assert!(long.validate(&()).is_err());
    }

    #[test]
    fn phone_is_limited_to_32_characters() {
        let long = profile(serde_json::json!({ "phone": "0".repeat(33) }));
        assert!(long.validate(&()).is_err());
    }
}
