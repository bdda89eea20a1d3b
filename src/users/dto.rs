use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::users::repo_types::UserRecord;

/// Public projection of a user. `profile_picture` and `date_joined` are
/// deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub facebook_id: String,
    pub full_name: String,
    pub email: String,
}

impl From<&UserRecord> for UserView {
    fn from(u: &UserRecord) -> Self {
        Self {
            facebook_id: u.facebook_id.clone(),
            full_name: u.full_name.clone(),
            email: u.email.clone(),
        }
    }
}

impl From<UserRecord> for UserView {
    fn from(u: UserRecord) -> Self {
        Self {
            facebook_id: u.facebook_id,
            full_name: u.full_name,
            email: u.email,
        }
    }
}

impl UserView {
    /// Positional field order used by the table export.
    pub fn fields(&self) -> [&str; 3] {
        [
            self.facebook_id.as_str(),
            self.full_name.as_str(),
            self.email.as_str(),
        ]
    }
}

/// Accepts any JSON scalar and keeps its text; `null`, arrays and objects
/// read as absent. Form values arrive as strings already.
fn scalar_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub facebook_id: Option<String>,
}

/// Request body for registration.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub facebook_id: Option<String>,
}

/// Query string for `GET /users/me`.
#[derive(Debug, Default, Deserialize)]
pub struct CurrentUserQuery {
    pub facebook_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn view_hides_internal_fields() {
        let record = UserRecord {
            id: 7,
            facebook_id: "fb1".into(),
            full_name: "Bob".into(),
            email: "bob@example.com".into(),
            profile_picture: Some("https://cdn.example.com/bob.png".into()),
            date_joined: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_value(UserView::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "facebook_id": "fb1",
                "full_name": "Bob",
                "email": "bob@example.com",
            })
        );
        assert_eq!(
            UserView::from(record).fields(),
            ["fb1", "Bob", "bob@example.com"]
        );
    }

    #[test]
    fn login_request_stringifies_scalars() {
        let req: LoginRequest = serde_json::from_str(r#"{"facebook_id": 123}"#).unwrap();
        assert_eq!(req.facebook_id.as_deref(), Some("123"));

        let req: LoginRequest = serde_json::from_str(r#"{"facebook_id": null}"#).unwrap();
        assert!(req.facebook_id.is_none());

        let req: LoginRequest = serde_json::from_str(r#"{"facebook_id": ["a"]}"#).unwrap();
        assert!(req.facebook_id.is_none());

        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.facebook_id.is_none());
    }
}
