pub mod activity_repository;
pub mod comment_repository;
pub mod family_repository;
pub mod user_repository;

pub use activity_repository::{ActivityChanges, ActivityRepository, SheetActivityRepository};
pub use comment_repository::{CommentRepository, SheetCommentRepository};
pub use family_repository::{FamilyRepository, SheetFamilyRepository};
pub use user_repository::{SheetUserRepository, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::RowStoreError),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub(crate) fn bool_cell(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

pub(crate) fn parse_bool_cell(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
