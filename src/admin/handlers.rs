use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::config::validation::is_web_url;
use crate::error::GateError;
use crate::http::server::AppState;
use crate::store::{self, DestinationRecord};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub mode: &'static str,
    pub keyed: bool,
    pub links: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateLink {
    pub human_url: String,
    pub bot_url: String,
}

#[derive(Debug, Serialize)]
pub struct LinkView {
    pub id: String,
    pub path: String,
    pub human_url: String,
    pub bot_url: String,
    pub created_at: u64,
}

impl LinkView {
    fn new(state: &AppState, id: String, record: DestinationRecord) -> Self {
        let path = format!("{}/{}", state.config.keyed.prefix.trim_end_matches('/'), id);
        Self {
            id,
            path,
            human_url: record.human_url,
            bot_url: record.bot_url,
            created_at: record.created_at,
        }
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        mode: state.dispatcher.mode().as_str(),
        keyed: state.config.keyed.enabled,
        links: state.store.len(),
    })
}

pub async fn create_link(
    State(state): State<AppState>,
    Json(input): Json<CreateLink>,
) -> Result<(StatusCode, Json<LinkView>), GateError> {
    let human_url = input.human_url.trim();
    let bot_url = input.bot_url.trim();
    for (field, value) in [("human_url", human_url), ("bot_url", bot_url)] {
        if !is_web_url(value) {
            return Err(GateError::InvalidInput(format!(
                "`{field}` must be an absolute http or https URL"
            )));
        }
    }

    let links = state.store.clone();
    let id_length = state.config.keyed.id_length;
    let (human_url, bot_url) = (human_url.to_string(), bot_url.to_string());
    // Persistence does blocking file I/O.
    let (id, record) = tokio::task::spawn_blocking(move || {
        store::register(links.as_ref(), id_length, &human_url, &bot_url)
    })
    .await
    .map_err(|e| GateError::Internal(e.to_string()))?
    .map_err(|e| GateError::Internal(e.to_string()))?;

    tracing::info!(id = %id, "Link created");
    Ok((StatusCode::CREATED, Json(LinkView::new(&state, id, record))))
}

pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LinkView>, GateError> {
    match state.store.get(&id) {
        Some(record) => Ok(Json(LinkView::new(&state, id, record))),
        None => Err(GateError::UnknownLink(id)),
    }
}
