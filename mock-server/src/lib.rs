use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    pub title: String,
    pub director: String,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Default)]
pub struct MockState {
    /// email -> password
    users: HashMap<String, String>,
    /// bearer token -> email
    sessions: HashMap<String, String>,
    /// Insertion order is list order, like the real backend.
    movies: Vec<Movie>,
}

pub type Db = Arc<RwLock<MockState>>;

type ErrorResponse = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(MockState::default()));
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/movies", get(list_movies).post(create_movie))
        .route("/api/movies/{id}", put(update_movie).delete(delete_movie))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error_response(status: StatusCode, message: &str) -> ErrorResponse {
    (status, Json(json!({ "error": message })))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn authorize(db: &Db, headers: &HeaderMap) -> Result<(), ErrorResponse> {
    let authorized = match bearer_token(headers) {
        Some(token) => db.read().await.sessions.contains_key(token),
        None => false,
    };
    if authorized {
        Ok(())
    } else {
        Err(error_response(StatusCode::UNAUTHORIZED, "No autorizado"))
    }
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    if let Some(confirm) = input.confirm_password.as_deref() {
        if confirm != input.password {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Las contraseñas no coinciden",
            ));
        }
    }
    let mut state = db.write().await;
    if state.users.contains_key(&input.email) {
        return Err(error_response(StatusCode::BAD_REQUEST, "El email ya existe"));
    }
    state.users.insert(input.email, input.password);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Usuario registrado" })),
    ))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>, ErrorResponse> {
    let mut state = db.write().await;
    if state.users.get(&input.email) != Some(&input.password) {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Credenciales inválidas",
        ));
    }
    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), input.email);
    Ok(Json(json!({ "token": token })))
}

async fn list_movies(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Movie>>, ErrorResponse> {
    authorize(&db, &headers).await?;
    Ok(Json(db.read().await.movies.clone()))
}

async fn create_movie(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<MovieInput>,
) -> Result<(StatusCode, Json<Movie>), ErrorResponse> {
    authorize(&db, &headers).await?;
    let now = Utc::now().to_rfc3339();
    let movie = Movie {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        director: input.director,
        poster_url: input.poster_url,
        year: input.year,
        created_at: now.clone(),
        updated_at: now,
    };
    db.write().await.movies.push(movie.clone());
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn update_movie(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<MovieInput>,
) -> Result<Json<Movie>, ErrorResponse> {
    authorize(&db, &headers).await?;
    let mut state = db.write().await;
    let movie = state
        .movies
        .iter_mut()
        .find(|movie| movie.id == id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Película no encontrada"))?;
    movie.title = input.title;
    movie.director = input.director;
    movie.poster_url = input.poster_url;
    movie.year = input.year;
    movie.updated_at = Utc::now().to_rfc3339();
    Ok(Json(movie.clone()))
}

async fn delete_movie(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ErrorResponse> {
    authorize(&db, &headers).await?;
    let mut state = db.write().await;
    let before = state.movies.len();
    state.movies.retain(|movie| movie.id != id);
    if state.movies.len() == before {
        return Err(error_response(StatusCode::NOT_FOUND, "Película no encontrada"));
    }
    Ok(StatusCode::NO_CONTENT)
}
