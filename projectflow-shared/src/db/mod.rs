/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a bounded acquire timeout
/// - `migrations`: embedded schema migrations and their status
/// - Row types and queries live in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use projectflow_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod migrations;
