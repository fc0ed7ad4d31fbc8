/// Database utilities
///
/// - `pool`: PostgreSQL connection pool management
/// - `migrations`: Migration runner (sqlx embedded migrations)

pub mod migrations;
pub mod pool;
