//! Admin console API: fixed-credential login, user-table CRUD and catalog
//! management. Every route except `/login` sits behind the admin gate.

use axum::{Json, Router};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header::SET_COOKIE};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use serde::Deserialize;
use tracing::info;

use crate::catalog::{Membership, Product, Video, opt_price_from_json, price_from_json};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::identity::{self, Principal};

use super::{AppState, require_admin};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/users", get(list_users))
        .route("/users/{id}", put(update_user).delete(delete_user))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/memberships", get(list_memberships))
        .route("/memberships/{id}", put(update_membership))
        .route("/videos", get(list_videos).post(create_video))
        .route("/videos/{id}", put(update_video).delete(delete_video))
}

fn db_error(context: &str, err: sqlx::Error) -> AppError {
    AppError::internal("db_error", format!("{context}: {err}"))
}

// --- Session ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AdminLoginPayload {
    username: String,
    password: String,
}

async fn login(State(state): State<AppState>, Json(payload): Json<AdminLoginPayload>) -> AppResult<Response> {
    if payload.username != state.config.admin_user || payload.password != state.config.admin_pass {
        return Err(AppError::auth("invalid_credentials", "Invalid admin credentials"));
    }
    let session = state.sessions.issue(Principal::Admin);
    info!(target: "fitserve", "admin login");
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, identity::session_cookie(&session.session_id));
    Ok((headers, Json(serde_json::json!({ "ok": true }))).into_response())
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    require_admin(&state, &headers)?;
    if let Some(sid) = identity::session_id_from_headers(&headers) {
        state.sessions.destroy(&sid);
    }
    let mut h = HeaderMap::new();
    h.insert(SET_COOKIE, identity::clear_session_cookie());
    Ok((h, Json(serde_json::json!({ "ok": true }))).into_response())
}

/// Liveness probe for the console: 200 while the admin session holds.
async fn me(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// --- User table -------------------------------------------------------------

async fn list_users(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Vec<db::AdminUser>>> {
    require_admin(&state, &headers)?;
    let users = db::list_users(&state.db).await.map_err(|e| db_error("list users", e))?;
    Ok(Json(users))
}

async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<db::UserPatch>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    let found = db::admin_update_user(&state.db, id, &patch).await.map_err(|e| {
        if db::is_unique_violation(&e) {
            AppError::conflict("duplicate_email", "Email already registered")
        } else {
            db_error("update user", e)
        }
    })?;
    if !found {
        return Err(AppError::not_found("user_not_found", "User not found"));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    let removed = db::delete_user(&state.db, id).await.map_err(|e| db_error("delete user", e))?;
    if !removed {
        return Err(AppError::not_found("user_not_found", "User not found"));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

// --- Products ---------------------------------------------------------------

async fn list_products(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Vec<Product>>> {
    require_admin(&state, &headers)?;
    Ok(Json(state.catalog.products.read_all()?))
}

#[derive(Debug, Deserialize)]
struct NewProduct {
    name: String,
    #[serde(rename = "priceUSD", deserialize_with = "price_from_json")]
    price_usd: f64,
    #[serde(rename = "priceINR", deserialize_with = "price_from_json")]
    price_inr: f64,
}

async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewProduct>,
) -> AppResult<Json<Product>> {
    require_admin(&state, &headers)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::user("missing_field", "Product name is required"));
    }
    let stored = state.catalog.products.create(Product {
        id: 0,
        name: payload.name.trim().to_string(),
        price_usd: payload.price_usd,
        price_inr: payload.price_inr,
    })?;
    Ok(Json(stored))
}

#[derive(Debug, Default, Deserialize)]
struct ProductPatch {
    name: Option<String>,
    #[serde(rename = "priceUSD", default, deserialize_with = "opt_price_from_json")]
    price_usd: Option<f64>,
    #[serde(rename = "priceINR", default, deserialize_with = "opt_price_from_json")]
    price_inr: Option<f64>,
}

async fn update_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<Json<Product>> {
    require_admin(&state, &headers)?;
    let updated = state.catalog.products.update(id, |p| {
        if let Some(name) = patch.name {
            p.name = name;
        }
        if let Some(usd) = patch.price_usd {
            p.price_usd = usd;
        }
        if let Some(inr) = patch.price_inr {
            p.price_inr = inr;
        }
    })?;
    Ok(Json(updated))
}

async fn delete_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    state.catalog.products.delete(id)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// --- Memberships ------------------------------------------------------------

async fn list_memberships(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Vec<Membership>>> {
    require_admin(&state, &headers)?;
    Ok(Json(state.catalog.memberships.read_all()?))
}

/// Plans are fixed seed data: only the price and the video link move.
#[derive(Debug, Default, Deserialize)]
struct MembershipPatch {
    #[serde(rename = "priceINR", default, deserialize_with = "opt_price_from_json")]
    price_inr: Option<f64>,
    #[serde(rename = "videoLink")]
    video_link: Option<String>,
}

async fn update_membership(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(patch): Json<MembershipPatch>,
) -> AppResult<Json<Membership>> {
    require_admin(&state, &headers)?;
    let updated = state.catalog.memberships.update(id, |m| {
        if let Some(inr) = patch.price_inr {
            m.price_inr = inr;
        }
        if let Some(link) = patch.video_link {
            m.video_link = link;
        }
    })?;
    Ok(Json(updated))
}

// --- Videos -----------------------------------------------------------------

async fn list_videos(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<Vec<Video>>> {
    require_admin(&state, &headers)?;
    Ok(Json(state.catalog.videos.read_all()?))
}

#[derive(Debug, Deserialize)]
struct NewVideo {
    title: String,
    #[serde(default)]
    category: String,
    url: String,
    #[serde(default)]
    thumbnail: String,
}

async fn create_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewVideo>,
) -> AppResult<Json<Video>> {
    require_admin(&state, &headers)?;
    if payload.title.trim().is_empty() || payload.url.trim().is_empty() {
        return Err(AppError::user("missing_field", "Title and url are required"));
    }
    let stored = state.catalog.videos.create(Video {
        id: 0,
        title: payload.title.trim().to_string(),
        category: payload.category.trim().to_string(),
        url: payload.url.trim().to_string(),
        thumbnail: payload.thumbnail.trim().to_string(),
    })?;
    Ok(Json(stored))
}

#[derive(Debug, Default, Deserialize)]
struct VideoPatch {
    title: Option<String>,
    category: Option<String>,
    url: Option<String>,
    thumbnail: Option<String>,
}

async fn update_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(patch): Json<VideoPatch>,
) -> AppResult<Json<Video>> {
    require_admin(&state, &headers)?;
    let updated = state.catalog.videos.update(id, |v| {
        if let Some(title) = patch.title {
            v.title = title;
        }
        if let Some(category) = patch.category {
            v.category = category;
        }
        if let Some(url) = patch.url {
            v.url = url;
        }
        if let Some(thumbnail) = patch.thumbnail {
            v.thumbnail = thumbnail;
        }
    })?;
    Ok(Json(updated))
}

async fn delete_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    state.catalog.videos.delete(id)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
