mod pg_account_repository;
mod pg_file_repository;

pub use pg_account_repository::PgAccountRepository;
pub use pg_file_repository::PgFileRepository;
