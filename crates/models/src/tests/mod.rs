/// Database connection and pool configuration tests
pub mod db_tests;


/// Skip guard shared by the database-backed tests.
pub(crate) fn db_tests_disabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}
