//! SQLite document store (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;
use travel_core::ports::{TravelPlanStore, UserAccountStore};
use travel_core::{
    NewTravelPlan, PlanFilter, TravelError, TravelPlan, TravelPlanPatch, UpdateOutcome,
    UserAccount,
};

const PLAN_COLUMNS: &str = "id, travel_date, leaving_time, arriving_time, departure_location, \
                            destination_location, travel_reason, description";

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, gone when the store is dropped.
    pub async fn in_memory() -> Result<Self> {
        let options: SqliteConnectOptions = "sqlite::memory:"
            .parse()
            .context("Invalid in-memory SQLite options")?;

        // Every connection to :memory: opens a separate database, so pin exactly one
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Travel plans table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS travel_plans (
                id TEXT PRIMARY KEY,
                travel_date TEXT NOT NULL,
                leaving_time TEXT NOT NULL,
                arriving_time TEXT NOT NULL,
                departure_location TEXT NOT NULL,
                destination_location TEXT NOT NULL,
                travel_reason TEXT NOT NULL,
                description TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        // User accounts table; the UNIQUE constraint closes the check-then-insert race
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_accounts (
                id TEXT PRIMARY KEY,
                account_name TEXT,
                email_id TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> TravelError {
    TravelError::Database(e.to_string())
}

#[async_trait]
impl TravelPlanStore for Database {
    async fn insert_plan(&self, plan: NewTravelPlan) -> travel_core::Result<TravelPlan> {
        let plan = TravelPlan::new(uuid::Uuid::new_v4().to_string(), plan);

        sqlx::query(
            r#"
            INSERT INTO travel_plans (id, travel_date, leaving_time, arriving_time,
                                      departure_location, destination_location,
                                      travel_reason, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.travel_date)
        .bind(&plan.leaving_time)
        .bind(&plan.arriving_time)
        .bind(&plan.departure_location)
        .bind(&plan.destination_location)
        .bind(&plan.travel_reason)
        .bind(&plan.description)
        .execute(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(plan)
    }

    async fn get_plan(&self, id: &str) -> travel_core::Result<Option<TravelPlan>> {
        let row: Option<PlanRow> = sqlx::query_as(&format!(
            "SELECT {} FROM travel_plans WHERE id = ?1",
            PLAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_plans(&self, filter: &PlanFilter) -> travel_core::Result<Vec<TravelPlan>> {
        let rows: Vec<PlanRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM travel_plans
            WHERE (?1 IS NULL OR departure_location = ?1)
              AND (?2 IS NULL OR destination_location = ?2)
              AND (?3 IS NULL OR travel_date = ?3)
            ORDER BY rowid
            "#,
            PLAN_COLUMNS
        ))
        .bind(filter.departure_location.as_deref())
        .bind(filter.destination_location.as_deref())
        .bind(filter.travel_date.as_deref())
        .fetch_all(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn update_plan(
        &self,
        id: &str,
        patch: &TravelPlanPatch,
    ) -> travel_core::Result<UpdateOutcome> {
        // Compare and write in one statement so concurrent writers only queue on
        // SQLite's write lock instead of upgrading a stale read snapshot
        let result = sqlx::query(
            r#"
            UPDATE travel_plans
            SET travel_date = COALESCE(?1, travel_date),
                leaving_time = COALESCE(?2, leaving_time),
                arriving_time = COALESCE(?3, arriving_time),
                departure_location = COALESCE(?4, departure_location),
                destination_location = COALESCE(?5, destination_location),
                travel_reason = COALESCE(?6, travel_reason),
                description = COALESCE(?7, description)
            WHERE id = ?8
              AND (travel_date IS NOT COALESCE(?1, travel_date)
                OR leaving_time IS NOT COALESCE(?2, leaving_time)
                OR arriving_time IS NOT COALESCE(?3, arriving_time)
                OR departure_location IS NOT COALESCE(?4, departure_location)
                OR destination_location IS NOT COALESCE(?5, destination_location)
                OR travel_reason IS NOT COALESCE(?6, travel_reason)
                OR description IS NOT COALESCE(?7, description))
            "#,
        )
        .bind(patch.travel_date.as_deref())
        .bind(patch.leaving_time.as_deref())
        .bind(patch.arriving_time.as_deref())
        .bind(patch.departure_location.as_deref())
        .bind(patch.destination_location.as_deref())
        .bind(patch.travel_reason.as_deref())
        .bind(patch.description.as_deref())
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() > 0 {
            return Ok(UpdateOutcome::Modified);
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM travel_plans WHERE id = ?1")
            .bind(id)
            .fetch_one(&*self.pool)
            .await
            .map_err(db_err)?;

        if count > 0 {
            Ok(UpdateOutcome::Unchanged)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }

    async fn delete_plan(&self, id: &str) -> travel_core::Result<u64> {
        let result = sqlx::query("DELETE FROM travel_plans WHERE id = ?1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected())
    }

    async fn clear_plans(&self) -> travel_core::Result<u64> {
        let result = sqlx::query("DELETE FROM travel_plans")
            .execute(&*self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserAccountStore for Database {
    async fn email_exists(&self, email_id: &str) -> travel_core::Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_accounts WHERE email_id = ?1")
                .bind(email_id)
                .fetch_one(&*self.pool)
                .await
                .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn create_account(
        &self,
        email_id: &str,
        password_hash: &str,
        account_name: Option<&str>,
    ) -> travel_core::Result<String> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO user_accounts (id, account_name, email_id, password_hash)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(account_name)
        .bind(email_id)
        .bind(password_hash)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return TravelError::EmailTaken(email_id.to_string());
                }
            }
            db_err(e)
        })?;

        Ok(id)
    }

    async fn get_account_by_email(
        &self,
        email_id: &str,
    ) -> travel_core::Result<Option<UserAccount>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, account_name, email_id, password_hash
            FROM user_accounts WHERE email_id = ?1
            "#,
        )
        .bind(email_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct PlanRow {
    id: String,
    travel_date: String,
    leaving_time: String,
    arriving_time: String,
    departure_location: String,
    destination_location: String,
    travel_reason: String,
    description: Option<String>,
}

impl From<PlanRow> for TravelPlan {
    fn from(r: PlanRow) -> Self {
        TravelPlan {
            id: r.id,
            travel_date: r.travel_date,
            leaving_time: r.leaving_time,
            arriving_time: r.arriving_time,
            departure_location: r.departure_location,
            destination_location: r.destination_location,
            travel_reason: r.travel_reason,
            description: r.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    account_name: Option<String>,
    email_id: String,
    password_hash: String,
}

impl From<AccountRow> for UserAccount {
    fn from(r: AccountRow) -> Self {
        UserAccount {
            id: r.id,
            account_name: r.account_name,
            email_id: r.email_id,
            password_hash: r.password_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_plan(from: &str, to: &str, date: &str) -> NewTravelPlan {
        NewTravelPlan {
            travel_date: date.to_string(),
            leaving_time: "09:00".to_string(),
            arriving_time: "12:00".to_string(),
            departure_location: from.to_string(),
            destination_location: to.to_string(),
            travel_reason: "Work".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_plan_lifecycle() {
        let db = Database::in_memory().await.unwrap();

        let plan = db
            .insert_plan(new_plan("Belfast", "Dublin", "2024-03-01"))
            .await
            .unwrap();
        assert_eq!(db.get_plan(&plan.id).await.unwrap(), Some(plan.clone()));

        let patch = TravelPlanPatch {
            travel_reason: Some("Holiday".to_string()),
            ..Default::default()
        };
        assert_eq!(
            db.update_plan(&plan.id, &patch).await.unwrap(),
            UpdateOutcome::Modified
        );
        assert_eq!(
            db.update_plan(&plan.id, &patch).await.unwrap(),
            UpdateOutcome::Unchanged
        );
        let stored = db.get_plan(&plan.id).await.unwrap().unwrap();
        assert_eq!(stored.travel_reason, "Holiday");

        assert_eq!(db.delete_plan(&plan.id).await.unwrap(), 1);
        assert_eq!(db.delete_plan(&plan.id).await.unwrap(), 0);
        assert_eq!(db.get_plan(&plan.id).await.unwrap(), None);
        assert_eq!(
            db.update_plan(&plan.id, &patch).await.unwrap(),
            UpdateOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let db = Database::in_memory().await.unwrap();
        let a = db.insert_plan(new_plan("Belfast", "Dublin", "2024-03-01")).await.unwrap();
        let b = db.insert_plan(new_plan("Cork", "Dublin", "2024-03-02")).await.unwrap();
        let c = db.insert_plan(new_plan("Belfast", "Galway", "2024-03-02")).await.unwrap();

        let all = db.list_plans(&PlanFilter::default()).await.unwrap();
        assert_eq!(all, vec![a.clone(), b.clone(), c.clone()]);

        let filter = PlanFilter {
            departure_location: Some("Belfast".to_string()),
            ..Default::default()
        };
        assert_eq!(db.list_plans(&filter).await.unwrap(), vec![a, c.clone()]);

        let filter = PlanFilter {
            departure_location: Some("Belfast".to_string()),
            travel_date: Some("2024-03-02".to_string()),
            ..Default::default()
        };
        assert_eq!(db.list_plans(&filter).await.unwrap(), vec![c]);

        assert_eq!(db.clear_plans().await.unwrap(), 3);
        assert!(db.list_plans(&PlanFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans.db");
        let db = Arc::new(Database::new(path.to_str().unwrap()).await.unwrap());

        let mut ids = Vec::new();
        for i in 0..40 {
            let plan = db
                .insert_plan(new_plan("Belfast", &format!("Stop {}", i), "2024-03-01"))
                .await
                .unwrap();
            ids.push(plan.id);
        }

        for round in 0..5 {
            let handles: Vec<_> = ids
                .iter()
                .cloned()
                .map(|id| {
                    let db = Arc::clone(&db);
                    tokio::spawn(async move {
                        let patch = TravelPlanPatch {
                            travel_reason: Some(format!("Round {}", round)),
                            ..Default::default()
                        };
                        db.update_plan(&id, &patch).await
                    })
                })
                .collect();

            for handle in handles {
                assert_eq!(handle.await.unwrap().unwrap(), UpdateOutcome::Modified);
            }
        }

        for id in &ids {
            let plan = db.get_plan(id).await.unwrap().unwrap();
            assert_eq!(plan.travel_reason, "Round 4");
        }
    }

    #[tokio::test]
    async fn test_update_description_from_empty() {
        let db = Database::in_memory().await.unwrap();
        let plan = db
            .insert_plan(new_plan("Belfast", "Dublin", "2024-03-01"))
            .await
            .unwrap();
        assert_eq!(plan.description, None);

        let patch = TravelPlanPatch {
            description: Some("Aisle seat".to_string()),
            ..Default::default()
        };
        assert_eq!(
            db.update_plan(&plan.id, &patch).await.unwrap(),
            UpdateOutcome::Modified
        );
        assert_eq!(
            db.update_plan(&plan.id, &patch).await.unwrap(),
            UpdateOutcome::Unchanged
        );
        assert_eq!(
            db.update_plan(&plan.id, &TravelPlanPatch::default()).await.unwrap(),
            UpdateOutcome::Unchanged
        );
        let stored = db.get_plan(&plan.id).await.unwrap().unwrap();
        assert_eq!(stored.description.as_deref(), Some("Aisle seat"));
        assert_eq!(stored.travel_reason, "Work");
    }

    #[tokio::test]
    async fn test_schema_has_only_exposed_columns() {
        let db = Database::in_memory().await.unwrap();

        let plan_columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('travel_plans')")
                .fetch_all(&*db.pool)
                .await
                .unwrap();
        assert_eq!(plan_columns.join(", "), PLAN_COLUMNS);

        let account_columns: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('user_accounts')")
                .fetch_all(&*db.pool)
                .await
                .unwrap();
        assert_eq!(
            account_columns,
            vec!["id", "account_name", "email_id", "password_hash"]
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_constraint() {
        let db = Database::in_memory().await.unwrap();

        let id = db
            .create_account("ada@example.com", "$argon2id$stub", Some("Ada"))
            .await
            .unwrap();
        assert!(db.email_exists("ada@example.com").await.unwrap());

        let err = db
            .create_account("ada@example.com", "$argon2id$other", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TravelError::EmailTaken(_)));

        let account = db.get_account_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.account_name.as_deref(), Some("Ada"));
    }
}
