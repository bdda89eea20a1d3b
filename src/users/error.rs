use crate::users::repo::StoreError;

/// Outcomes of the identity and export operations that are not a user view.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("required field missing")]
    MissingField,
    #[error("user not found")]
    NotFound,
    #[error("user already exists")]
    AlreadyExists,
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => UserError::AlreadyExists,
            other => UserError::Storage(other),
        }
    }
}
