use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tusk_storage::{
    CreateTaskParams, CreateUserParams, Store, StoreError, Task, TaskId, TaskListQuery, TaskPatch,
    TaskStatus, User, UserId,
};
use uuid::Uuid;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// Column tuples in table order. Timestamps are unix milliseconds.
type UserRow = (
    String,         // id
    String,         // username
    String,         // first_name
    Option<String>, // last_name
    String,         // email
    String,         // password_hash
    Option<i64>,    // birth_date
    i64,            // created_at
    i64,            // updated_at
);
type TaskRow = (
    String,         // id
    String,         // user_id
    String,         // title
    Option<String>, // details
    String,         // status
    Option<i64>,    // time
    i64,            // created_at
    i64,            // updated_at
);

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    /// Connect and run migrations, creating the database file if missing.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ───────────────────────────── Users ──────────────────────────────

    async fn create_user(&self, params: &CreateUserParams) -> Result<UserId, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp_millis();
        sqlx::query(
            "INSERT INTO users(id,username,first_name,last_name,email,password_hash,birth_date,created_at,updated_at)
             VALUES(?,?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&params.username)
        .bind(&params.first_name)
        .bind(&params.last_name)
        .bind(&params.email)
        .bind(&params.password_hash)
        .bind(params.birth_date.map(|t| t.timestamp_millis()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let s = e.to_string();
            if s.contains("UNIQUE") {
                StoreError::AlreadyExists
            } else {
                StoreError::Backend(s)
            }
        })?;
        Ok(UserId(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id,username,first_name,last_name,email,password_hash,birth_date,created_at,updated_at
             FROM users WHERE username=?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => user_from_row(row),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id,username,first_name,last_name,email,password_hash,birth_date,created_at,updated_at
             FROM users WHERE email=?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => user_from_row(row),
        }
    }

    async fn get_user_by_identifier(&self, identifier: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id,username,first_name,last_name,email,password_hash,birth_date,created_at,updated_at
             FROM users WHERE username=? OR email=?",
        )
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => user_from_row(row),
        }
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id,username,first_name,last_name,email,password_hash,birth_date,created_at,updated_at
             FROM users WHERE id=?",
        )
        .bind(user_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => user_from_row(row),
        }
    }

    // ───────────────────────────── Tasks ──────────────────────────────

    async fn create_task(&self, params: &CreateTaskParams) -> Result<Task, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp_millis();
        sqlx::query(
            "INSERT INTO tasks(id,user_id,title,details,status,time,created_at,updated_at)
             VALUES(?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.user_id.0.to_string())
        .bind(&params.title)
        .bind(&params.details)
        .bind(params.status.as_str())
        .bind(params.time.map(|t| t.timestamp_millis()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.get_task(&TaskId(id)).await
    }

    async fn get_task(&self, task_id: &TaskId) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id,user_id,title,details,status,time,created_at,updated_at
             FROM tasks WHERE id=?",
        )
        .bind(task_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => task_from_row(row),
        }
    }

    async fn list_tasks(&self, query: &TaskListQuery) -> Result<Vec<Task>, StoreError> {
        let rows = match query.status {
            Some(status) => {
                sqlx::query_as::<_, TaskRow>(
                    "SELECT id,user_id,title,details,status,time,created_at,updated_at
                     FROM tasks WHERE user_id=? AND status=? ORDER BY created_at ASC, id ASC",
                )
                .bind(query.user_id.0.to_string())
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, TaskRow>(
                    "SELECT id,user_id,title,details,status,time,created_at,updated_at
                     FROM tasks WHERE user_id=? ORDER BY created_at ASC, id ASC",
                )
                .bind(query.user_id.0.to_string())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(task_from_row(row)?);
        }
        Ok(out)
    }

    async fn update_task(&self, task_id: &TaskId, patch: &TaskPatch) -> Result<Task, StoreError> {
        let now = Utc::now().timestamp_millis();
        let result = sqlx::query(
            "UPDATE tasks SET
                 title=COALESCE(?,title),
                 details=COALESCE(?,details),
                 status=COALESCE(?,status),
                 time=COALESCE(?,time),
                 updated_at=?
             WHERE id=?",
        )
        .bind(&patch.title)
        .bind(&patch.details)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.time.map(|t| t.timestamp_millis()))
        .bind(now)
        .bind(task_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_task(task_id).await
    }

    async fn delete_task(&self, task_id: &TaskId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id=?")
            .bind(task_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_tasks_for_user(&self, user_id: &UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id=?")
            .bind(user_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

fn user_from_row(row: UserRow) -> Result<User, StoreError> {
    let (id, username, first_name, last_name, email, password_hash, birth_date, created, updated) =
        row;
    Ok(User {
        id: UserId(parse_id(&id)?),
        username,
        first_name,
        last_name,
        email,
        password_hash,
        birth_date: birth_date.map(from_millis).transpose()?,
        created_at: from_millis(created)?,
        updated_at: from_millis(updated)?,
    })
}

fn task_from_row(row: TaskRow) -> Result<Task, StoreError> {
    let (id, user_id, title, details, status, time, created, updated) = row;
    let status = TaskStatus::parse(&status)
        .ok_or_else(|| StoreError::Backend(format!("unknown task status: {status}")))?;
    Ok(Task {
        id: TaskId(parse_id(&id)?),
        user_id: UserId(parse_id(&user_id)?),
        title,
        details,
        status,
        time: time.map(from_millis).transpose()?,
        created_at: from_millis(created)?,
        updated_at: from_millis(updated)?,
    })
}

fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::try_parse(raw).map_err(|e| StoreError::Backend(e.to_string()))
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::Backend(format!("timestamp out of range: {millis}")))
}
