use tracing::{debug, info};

use crate::users::{
    dto::UserView,
    error::UserError,
    repo::UserStore,
    repo_types::NewUser,
};

/// Treats an absent and an empty value alike. No trimming.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

async fn lookup(store: &dyn UserStore, facebook_id: Option<&str>) -> Result<UserView, UserError> {
    let facebook_id = present(facebook_id).ok_or(UserError::MissingField)?;
    let user = store
        .find_by_facebook_id(facebook_id)
        .await?
        .ok_or(UserError::NotFound)?;
    debug!(user_id = user.id, "user found");
    Ok(UserView::from(user))
}

/// Possession of the identifier is the whole credential.
pub async fn login(store: &dyn UserStore, facebook_id: Option<&str>) -> Result<UserView, UserError> {
    lookup(store, facebook_id).await
}

/// Same lookup as [`login`]; only the calling convention differs.
pub async fn current_user(
    store: &dyn UserStore,
    facebook_id: Option<&str>,
) -> Result<UserView, UserError> {
    lookup(store, facebook_id).await
}

pub async fn register(
    store: &dyn UserStore,
    full_name: Option<&str>,
    email: Option<&str>,
    facebook_id: Option<&str>,
) -> Result<UserView, UserError> {
    let (Some(full_name), Some(email), Some(facebook_id)) =
        (present(full_name), present(email), present(facebook_id))
    else {
        return Err(UserError::MissingField);
    };

    // Early exit only; `create` still enforces uniqueness against races.
    if store.exists(facebook_id).await? {
        return Err(UserError::AlreadyExists);
    }

    let user = store
        .create(NewUser {
            facebook_id,
            full_name,
            email,
        })
        .await?;

    info!(user_id = user.id, date_joined = %user.date_joined, "user registered");
    Ok(UserView::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::MemoryUserStore;

    async fn store_with_alice() -> MemoryUserStore {
        let store = MemoryUserStore::new();
        register(
            &store,
            Some("Alice Smith"),
            Some("alice@example.com"),
            Some("fb123"),
        )
        .await
        .expect("register alice");
        store
    }

    #[tokio::test]
    async fn register_then_login_returns_same_view() {
        let store = MemoryUserStore::new();
        let created = register(
            &store,
            Some("Alice Smith"),
            Some("alice@example.com"),
            Some("fb123"),
        )
        .await
        .unwrap();
        assert_eq!(
            created,
            UserView {
                facebook_id: "fb123".into(),
                full_name: "Alice Smith".into(),
                email: "alice@example.com".into(),
            }
        );

        let logged_in = login(&store, Some("fb123")).await.unwrap();
        assert_eq!(logged_in, created);
        let me = current_user(&store, Some("fb123")).await.unwrap();
        assert_eq!(me, created);
    }

    #[tokio::test]
    async fn register_requires_all_three_fields() {
        let store = MemoryUserStore::new();
        let cases = [
            (None, Some("a@example.com"), Some("fb1")),
            (Some("A"), None, Some("fb1")),
            (Some("A"), Some("a@example.com"), None),
            (Some(""), Some("a@example.com"), Some("fb1")),
            (Some("A"), Some(""), Some("fb1")),
            (Some("A"), Some("a@example.com"), Some("")),
            (None, None, None),
        ];
        for (name, email, id) in cases {
            let err = register(&store, name, email, id).await.unwrap_err();
            assert!(matches!(err, UserError::MissingField), "{name:?} {email:?} {id:?}");
        }
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn register_duplicate_keeps_first_record() {
        let store = store_with_alice().await;
        let err = register(&store, Some("Other"), Some("other@example.com"), Some("fb123"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists));

        let still = login(&store, Some("fb123")).await.unwrap();
        assert_eq!(still.full_name, "Alice Smith");
        assert_eq!(still.email, "alice@example.com");
    }

    #[tokio::test]
    async fn lookup_rejects_missing_identifier_regardless_of_contents() {
        let store = store_with_alice().await;
        for id in [None, Some("")] {
            assert!(matches!(login(&store, id).await, Err(UserError::MissingField)));
            assert!(matches!(current_user(&store, id).await, Err(UserError::MissingField)));
        }
    }

    #[tokio::test]
    async fn lookup_of_unregistered_identifier_is_not_found() {
        let store = store_with_alice().await;
        assert!(matches!(login(&store, Some("fb999")).await, Err(UserError::NotFound)));
        assert!(matches!(
            current_user(&store, Some("fb999")).await,
            Err(UserError::NotFound)
        ));
    }

    #[tokio::test]
    async fn whitespace_identifier_is_not_trimmed() {
        let store = store_with_alice().await;
        assert!(matches!(login(&store, Some(" fb123")).await, Err(UserError::NotFound)));
    }
}
