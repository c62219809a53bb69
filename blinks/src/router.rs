use axum::extract::{Path, Query, State};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::actions::{parse_pubkey, parse_signature, Action};
use crate::card::{CardView, ClaimCard};
use crate::config::ConfigView;
use crate::consts::*;
use crate::cors;
use crate::dashboard::{DashboardView, PacketList};
use crate::error::AppError;
use crate::form::{CreatePacketForm, FeePreview};
use crate::format;
use crate::packet::{ClaimRecordView, PacketView};
use crate::schema::*;
use crate::state::AppState;
use crate::tx::TxState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/actions.json", get(actions_json))
        .route("/api/actions/{action}", get(get_action).post(post_action))
        .route("/api/actions/{action}/next", post(post_next))
        .route("/api/packets/{id}", get(get_packet))
        .route("/api/packets/{id}/claims", get(get_claims))
        .route("/api/packets/{id}/card", get(get_card))
        .route("/api/packets/{id}/claimed/{address}", get(get_has_claimed))
        .route("/api/users/{address}/created", get(get_user_created))
        .route("/api/users/{address}/claimed", get(get_user_claimed))
        .route("/api/stats", get(get_stats))
        .route("/api/preview", get(get_preview))
        .route("/api/config", get(get_config))
        .route("/api/tx/{signature}", get(get_tx))
        .layer(cors::cors_layer())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cors::action_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn actions_json(State(state): State<AppState>) -> Json<ActionsJson> {
    let mut rules: Vec<ActionRule> = state
        .registry
        .paths()
        .into_iter()
        .map(|path| ActionRule {
            path_pattern: format!("/{path}"),
            api_path: format!("/api/actions/{path}"),
        })
        .collect();
    rules.push(ActionRule {
        path_pattern: "/api/actions/**".into(),
        api_path: "/api/actions/**".into(),
    });
    Json(ActionsJson { rules })
}

fn lookup(state: &AppState, name: &str) -> Result<Arc<dyn Action>, AppError> {
    state
        .registry
        .get(name)
        .ok_or_else(|| AppError::NotFound(format!("Unknown action '{name}'")))
}

async fn get_action(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ActionGetResponse>, AppError> {
    let action = lookup(&state, &name)?;

    // Still answer so the blink renders, just without a live button.
    if !state.config.is_configured() {
        let resp = ActionGetResponse::new(ICON_URL, action.title(), NOT_CONFIGURED_NOTICE, action.title())
            .with_error(NOT_CONFIGURED_NOTICE);
        return Ok(Json(resp));
    }

    Ok(Json(action.metadata(&state, params).await?))
}

async fn post_action(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<ActionPostRequest>,
) -> Result<Json<ActionPostResponse>, AppError> {
    let action = lookup(&state, &name)?;
    if !state.config.is_configured() {
        return Err(AppError::NotConfigured);
    }
    let account = parse_pubkey(&body.account)?;
    Ok(Json(action.execute(&state, account, params).await?))
}

async fn post_next(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<NextActionPostRequest>,
) -> Result<Json<ActionGetResponse>, AppError> {
    let action = lookup(&state, &name)?;
    let account = parse_pubkey(&body.account)?;
    let signature = parse_signature(&body.signature)?;
    Ok(Json(action.next(&state, account, signature, params).await?))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    account: Option<String>,
    packet: Option<u64>,
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let viewer = query.account.as_deref().map(parse_pubkey).transpose()?;
    let mut list = PacketList::new(state.reader.as_ref(), viewer, query.packet)
        .with_configured(state.config.is_configured());
    list.refresh().await;
    Ok(Json(list.view(state.base_url(), format::now_unix())))
}

async fn get_packet(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PacketView>, AppError> {
    let packet = state.reader.get_packet(id).await?;
    Ok(Json(PacketView::new(&packet, format::now_unix())))
}

async fn get_claims(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<ClaimRecordView>>, AppError> {
    let records = state.reader.get_claim_records(id).await?;
    Ok(Json(records.iter().map(ClaimRecordView::from).collect()))
}

#[derive(Debug, Deserialize)]
struct ViewerQuery {
    account: Option<String>,
}

async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<CardView>, AppError> {
    let viewer = query.account.as_deref().map(parse_pubkey).transpose()?;
    let packet = state.reader.get_packet(id).await?;
    let has_claimed = match viewer {
        Some(v) => state.reader.has_user_claimed(id, &v).await?,
        None => false,
    };
    let card = ClaimCard::new(&packet, viewer, has_claimed, format::now_unix());
    Ok(Json(card.view(state.base_url())))
}

#[derive(Debug, Serialize)]
struct ClaimedResponse {
    packet_id: u64,
    address: String,
    claimed: bool,
}

async fn get_has_claimed(
    State(state): State<AppState>,
    Path((id, address)): Path<(u64, String)>,
) -> Result<Json<ClaimedResponse>, AppError> {
    let user = parse_pubkey(&address)?;
    let claimed = state.reader.has_user_claimed(id, &user).await?;
    Ok(Json(ClaimedResponse {
        packet_id: id,
        address: user.to_string(),
        claimed,
    }))
}

async fn packets_by_ids(state: &AppState, ids: Vec<u64>) -> Result<Vec<PacketView>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let now = format::now_unix();
    let packets = state.reader.get_packets(&ids).await?;
    Ok(packets
        .iter()
        .flatten()
        .map(|p| PacketView::new(p, now))
        .collect())
}

async fn get_user_created(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Vec<PacketView>>, AppError> {
    let user = parse_pubkey(&address)?;
    let ids = state.reader.get_user_created_packets(&user).await?;
    Ok(Json(packets_by_ids(&state, ids).await?))
}

async fn get_user_claimed(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Vec<PacketView>>, AppError> {
    let user = parse_pubkey(&address)?;
    let ids = state.reader.get_user_claimed_packets(&user).await?;
    Ok(Json(packets_by_ids(&state, ids).await?))
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    packet_id_counter: u64,
    active_packets: u64,
    platform_fee_bps: u16,
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let (packet_id_counter, active_packets, platform_fee_bps) = tokio::try_join!(
        state.reader.packet_id_counter(),
        state.reader.active_packets_count(),
        state.reader.platform_fee_rate(),
    )?;
    Ok(Json(StatsResponse {
        packet_id_counter,
        active_packets,
        platform_fee_bps,
    }))
}

#[derive(Debug, Serialize)]
struct PreviewResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    preview: Option<FeePreview>,
}

async fn get_preview(Query(params): Query<HashMap<String, String>>) -> Json<PreviewResponse> {
    let form = CreatePacketForm::from_params(&params);
    let error = form.validate().err().map(|e| e.to_string());
    Json(PreviewResponse {
        valid: error.is_none(),
        error,
        preview: form.preview(),
    })
}

async fn get_config(State(state): State<AppState>) -> Json<ConfigView> {
    Json(ConfigView::from(state.config.as_ref()))
}

async fn get_tx(
    State(state): State<AppState>,
    Path(signature): Path<String>,
) -> Result<Json<TxState>, AppError> {
    let signature = parse_signature(&signature)?;
    Ok(Json(state.writer.transaction_status(&signature).await?))
}
