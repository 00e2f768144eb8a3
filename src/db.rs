//! External `user` table access. All statements are parameterized; each query
//! is an independent statement (no multi-statement transactions), so a failed
//! lastLogin touch never rolls back a login.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::Row;
use sqlx::mysql::MySqlPool;

/// Credential row fetched for login: the id plus the stored password, which
/// may be a bcrypt hash, a legacy plaintext value, or NULL.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: i64,
    pub password: Option<String>,
}

/// Profile fields exposed to the logged-in member (never the password).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub hobbies: Option<String>,
}

/// Full admin view of a user row (still excluding the password).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub hobbies: Option<String>,
    #[sqlx(rename = "lastLogin")]
    #[serde(rename = "lastLogin")]
    pub last_login: Option<NaiveDateTime>,
}

/// Admin-editable fields. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub hobbies: Option<String>,
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Find the credential row for a submitted login, which may be either the
/// email or the display name.
pub async fn find_credentials(pool: &MySqlPool, login: &str) -> Result<Option<Credentials>, sqlx::Error> {
    let row = sqlx::query("SELECT id, password FROM user WHERE email = ? OR name = ? LIMIT 1")
        .bind(login)
        .bind(login)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| Credentials { id: r.get("id"), password: r.get("password") }))
}

pub async fn insert_user(
    pool: &MySqlPool,
    name: &str,
    email: &str,
    password_hash: &str,
    address: &str,
    gender: &str,
    hobbies: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO user (name, email, password, address, gender, hobbies) VALUES (?, ?, ?, ?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(address)
        .bind(gender)
        .bind(hobbies)
        .execute(pool)
        .await?;
    Ok(())
}

/// Best-effort last-login stamp; callers log and ignore failures.
pub async fn touch_last_login(pool: &MySqlPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE user SET lastLogin = NOW() WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn fetch_profile(pool: &MySqlPool, id: i64) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, name, email, address, gender, hobbies FROM user WHERE id = ? LIMIT 1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Member self-service update: name and address only.
pub async fn update_profile(pool: &MySqlPool, id: i64, name: &str, address: &str) -> Result<bool, sqlx::Error> {
    if !user_exists(pool, id).await? {
        return Ok(false);
    }
    sqlx::query("UPDATE user SET name = ?, address = ? WHERE id = ?")
        .bind(name)
        .bind(address)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}

pub async fn list_users(pool: &MySqlPool) -> Result<Vec<AdminUser>, sqlx::Error> {
    sqlx::query_as::<_, AdminUser>(
        "SELECT id, name, email, address, gender, hobbies, lastLogin FROM user ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

async fn user_exists(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT id FROM user WHERE id = ? LIMIT 1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Admin update over any editable field. Returns false when the row does not
/// exist. `rows_affected` cannot distinguish "absent" from "unchanged" on
/// MySQL, hence the explicit existence probe.
pub async fn admin_update_user(pool: &MySqlPool, id: i64, patch: &UserPatch) -> Result<bool, sqlx::Error> {
    if !user_exists(pool, id).await? {
        return Ok(false);
    }
    sqlx::query(
        "UPDATE user SET \
             name = COALESCE(?, name), \
             email = COALESCE(?, email), \
             address = COALESCE(?, address), \
             gender = COALESCE(?, gender), \
             hobbies = COALESCE(?, hobbies) \
         WHERE id = ?",
    )
    .bind(&patch.name)
    .bind(&patch.email)
    .bind(&patch.address)
    .bind(&patch.gender)
    .bind(&patch.hobbies)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(true)
}

pub async fn delete_user(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}
