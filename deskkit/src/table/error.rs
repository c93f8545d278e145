use thiserror::Error;

/// Errors raised by table mutators for requests that cannot apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not filterable")]
    NotFilterable(String),

    #[error("column '{0}' is not sortable")]
    NotSortable(String),

    #[error("column id '{0}' collides with a query parameter")]
    ReservedColumn(String),

    #[error("duplicate column id '{0}'")]
    DuplicateColumn(String),

    #[error("page size must be positive")]
    InvalidPageSize,
}
