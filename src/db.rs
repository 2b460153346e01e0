use crate::schema::results;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn establish_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder().max_size(max_size.max(1)).build(manager)
}

pub fn configure_connection(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute("PRAGMA busy_timeout = 2000;")?;
    conn.batch_execute("PRAGMA journal_mode = WAL;")?;
    conn.batch_execute("PRAGMA synchronous = NORMAL;")?;
    Ok(())
}

pub fn run_migrations(conn: &mut SqliteConnection) -> Result<usize, String> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| applied.len())
        .map_err(|e| e.to_string())
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = results)]
pub struct StoredResult {
    pub id: i32,
    pub subject_name: String,
    pub score: i32,
    pub category: String,
    pub severity: String,
    pub answers: String,
    pub completed_at: i64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = results)]
pub struct NewResult {
    pub subject_name: String,
    pub score: i32,
    pub category: String,
    pub severity: String,
    pub answers: String,
    pub completed_at: i64,
}

pub fn insert_result(conn: &mut SqliteConnection, new_result: &NewResult) -> QueryResult<usize> {
    use crate::schema::results::dsl::*;

    diesel::insert_into(results)
        .values(new_result)
        .execute(conn)
}

pub fn first_result_id(conn: &mut SqliteConnection) -> QueryResult<Option<i32>> {
    use crate::schema::results::dsl::*;

    results.select(id).first::<i32>(conn).optional()
}

pub fn recent_results(conn: &mut SqliteConnection, limit: i64) -> QueryResult<Vec<StoredResult>> {
    use crate::schema::results::dsl::*;

    results
        .order(completed_at.desc())
        .limit(limit)
        .select(StoredResult::as_select())
        .load(conn)
}
