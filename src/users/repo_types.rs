use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database. Never serialized; clients see `UserView`.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,                         // insertion order
    pub facebook_id: String,             // social-login identifier, unique
    pub full_name: String,
    pub email: String,
    pub profile_picture: Option<String>, // stored, never exposed
    pub date_joined: OffsetDateTime,     // set once by the store
}

/// Fields required to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub facebook_id: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
}
