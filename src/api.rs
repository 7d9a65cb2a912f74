use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{Identifiable, NewTask, Task, UserProfile};

/// Header carrying the API key on every authorized request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Shown for any failure that never produced a usable server response.
pub const TRANSPORT_MESSAGE: &str = "Could not reach the task service.";

const DEFAULT_URL: &str = "http://localhost:8000";

/// Returns the service base URL (`TASKHUB_URL` env var, or the default).
pub fn base_url() -> String {
    std::env::var("TASKHUB_URL").unwrap_or_else(|_| DEFAULT_URL.to_string())
}

/// Why a request produced no result.
#[derive(Debug)]
pub enum ApiError {
    /// The server answered with a non-success status and a message.
    Rejected(String),
    /// The request never completed, or the response body was not valid
    /// JSON. The detail is kept here but never shown to the user.
    Transport(String),
}

impl ApiError {
    /// The user-facing text: server rejections verbatim, transport
    /// failures as a fixed generic message.
    pub fn message(&self) -> String {
        match self {
            ApiError::Rejected(message) => message.clone(),
            ApiError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(rename = "apiKey")]
    api_key: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Exchanges a username and password for an API key.
pub fn login(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let resp = client
        .post(format!("{base_url}/login"))
        .json(&LoginRequest { username, password })
        .send()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let text = resp.text().map_err(|e| ApiError::Transport(e.to_string()))?;
    if status.is_success() {
        let body: LoginResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(body.api_key)
    } else {
        let body: MessageBody =
            serde_json::from_str(&text).map_err(|e| ApiError::Transport(e.to_string()))?;
        Err(ApiError::Rejected(body.message))
    }
}

fn get_with_api_key<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    api_key: &str,
    endpoint: &str,
) -> Result<T, ApiError> {
    let resp = client
        .get(format!("{base_url}/{endpoint}"))
        .header(API_KEY_HEADER, api_key)
        .send()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(ApiError::Rejected(format!(
            "Fetching {} failed: HTTP {}",
            endpoint,
            resp.status()
        )));
    }
    resp.json().map_err(|e| ApiError::Transport(e.to_string()))
}

pub fn fetch_profile(client: &Client, base_url: &str, api_key: &str) -> Result<UserProfile, ApiError> {
    get_with_api_key(client, base_url, api_key, "profile")
}

pub fn fetch_users(client: &Client, base_url: &str, api_key: &str) -> Result<Vec<Identifiable>, ApiError> {
    get_with_api_key(client, base_url, api_key, "users")
}

pub fn fetch_groups(client: &Client, base_url: &str, api_key: &str) -> Result<Vec<Identifiable>, ApiError> {
    get_with_api_key(client, base_url, api_key, "groups")
}

pub fn fetch_tasks(client: &Client, base_url: &str, api_key: &str) -> Result<Vec<Task>, ApiError> {
    get_with_api_key(client, base_url, api_key, "tasks")
}

/// Creates a task. Success and failure both carry a server message.
pub fn create_task(
    client: &Client,
    base_url: &str,
    api_key: &str,
    task: &NewTask,
) -> Result<String, ApiError> {
    let resp = client
        .post(format!("{base_url}/tasks/create"))
        .header(API_KEY_HEADER, api_key)
        .json(task)
        .send()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    message_outcome(resp)
}

/// Runs a task mutation (`complete` or `delete`) by id.
pub fn modify_task(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: u64,
    action: &str,
) -> Result<String, ApiError> {
    let resp = client
        .post(format!("{base_url}/tasks/{action}/{id}"))
        .header(API_KEY_HEADER, api_key)
        .send()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    message_outcome(resp)
}

fn message_outcome(resp: Response) -> Result<String, ApiError> {
    let status = resp.status();
    let text = resp.text().map_err(|e| ApiError::Transport(e.to_string()))?;
    let body: MessageBody =
        serde_json::from_str(&text).map_err(|e| ApiError::Transport(e.to_string()))?;
    if status.is_success() {
        Ok(body.message)
    } else {
        Err(ApiError::Rejected(body.message))
    }
}
