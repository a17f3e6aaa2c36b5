//! `PostgreSQL` adapters for review task persistence.

mod models;
mod repository;
mod schema;

pub use repository::{
    CREATE_REVIEW_TABLES_SQL, PostgresArchiveRepository, PostgresReviewTaskRepository,
    ReviewPgPool, apply_schema,
};
