//! SQLite store
//!
//! Handles all database interactions for users and exercises.

use super::{Exercise, ExerciseStore, LogFilter, NewExercise, StoreError, User};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Database connection pool for users and exercises
pub struct SqliteStore {
    pool: SqlitePool,
    timeout: Duration,
}

/// Strip the `sqlite:` scheme, leaving the file path (if any)
fn file_path(database_url: &str) -> Option<&str> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}

impl SqliteStore {
    /// Initialize database connection pool
    ///
    /// # Arguments
    /// * `database_url` - SQLite URL or bare path to the database file
    /// * `timeout` - Upper bound for every store call
    ///
    /// # Returns
    /// * `Ok(SqliteStore)` if successful
    /// * `Err(StoreError)` if connection or migration failed
    pub async fn new(database_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let file = file_path(database_url);

        // Ensure parent directory exists
        if let Some(parent) = file.and_then(|f| Path::new(f).parent()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("Failed to create db directory: {}", e))
            })?;
        }

        let connection_string = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite:{}", database_url)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| StoreError::Backend(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        // Every pooled connection to `:memory:` would be a separate database
        let max_connections = if file.is_some() { 5 } else { 1 };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout);
        if file.is_none() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to database: {}", e)))?;

        info!("Connected to SQLite database at: {}", database_url);

        let store = Self { pool, timeout };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_exercise_tables.sql");

        // Drop comment lines and inline comments, then split on semicolons
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = match trimmed.find("--") {
                Some(comment_pos) => &trimmed[..comment_pos],
                None => trimmed,
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        let statements = cleaned_sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty());

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    StoreError::Backend(format!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Await `fut`, failing with [`StoreError::Timeout`] once the deadline passes
    async fn timed<T, F>(&self, fut: F) -> Result<Result<T, sqlx::Error>, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::timeout(self.timeout))
    }

    /// Like [`Self::timed`], with driver errors classified as well
    async fn run<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        self.timed(fut)
            .await?
            .map_err(|e| StoreError::from_sqlx(e, self.timeout))
    }

    /// Replace the per-call deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the database pool (for advanced operations if needed)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ExerciseStore for SqliteStore {
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
        };

        let insert = sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .execute(&self.pool);

        let result = self.timed(insert).await?;
        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(StoreError::DuplicateUsername(user.username));
            }
            Err(e) => return Err(StoreError::from_sqlx(e, self.timeout)),
        }

        debug!("Created user: {}", user.id);
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let fetch =
            sqlx::query_as::<_, User>("SELECT id, username FROM users ORDER BY rowid ASC")
                .fetch_all(&self.pool);

        self.run(fetch).await
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let fetch = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool);

        self.run(fetch).await
    }

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise, StoreError> {
        let exercise = exercise.into_exercise();

        let insert = sqlx::query(
            "INSERT INTO exercises (id, user_id, description, duration, date) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&exercise.id)
        .bind(&exercise.user_id)
        .bind(&exercise.description)
        .bind(exercise.duration)
        .bind(exercise.date)
        .execute(&self.pool);

        self.run(insert).await?;

        debug!(
            "Added exercise {} for user {}",
            exercise.id, exercise.user_id
        );
        Ok(exercise)
    }

    async fn find_exercises(&self, filter: &LogFilter) -> Result<Vec<Exercise>, StoreError> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, user_id, description, duration, date FROM exercises WHERE user_id = ",
        );
        query.push_bind(filter.user_id.clone());
        if let Some(from) = filter.from {
            query.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND date <= ").push_bind(to);
        }
        query.push(" ORDER BY date ASC, rowid ASC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let fetch = query.build_query_as::<Exercise>().fetch_all(&self.pool);
        let exercises = self.run(fetch).await?;

        debug!(
            "Found {} exercises for user {}",
            exercises.len(),
            filter.user_id
        );
        Ok(exercises)
    }
}
