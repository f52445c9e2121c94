//! REST API: request/response payloads, error mapping and route registration.

use actix_web::{
    delete, error, get, http::StatusCode, patch, post, put,
    web::{self, Data, Json, Path, Query},
    HttpRequest, HttpResponse, ResponseError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::{Advance, TournamentPatch};
use crate::models::{
    ErrorCategory, MatchId, Participant, ParticipantId, Round, SeedingPolicy, TournamentDraft,
    TournamentError, TournamentId, TournamentStatus, UserId,
};
use crate::service::TournamentService;

type AppState = Data<TournamentService>;
type ApiResult = Result<HttpResponse, TournamentError>;

/// Error body: machine-readable kind plus a message for toasts.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ResponseError for TournamentError {
    fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            kind: self.kind().to_string(),
            message: self.to_string(),
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

fn default_min_participants() -> u32 {
    2
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    description: String,
    format: String,
    #[serde(default)]
    rules: Option<String>,
    organizer_id: UserId,
    max_participants: u32,
    #[serde(default = "default_min_participants")]
    min_participants: u32,
    start_time: DateTime<Utc>,
    #[serde(default)]
    prize_pool: Option<String>,
    #[serde(default)]
    seeding: SeedingPolicy,
}

impl From<CreateTournamentBody> for TournamentDraft {
    fn from(body: CreateTournamentBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            format: body.format,
            rules: body.rules,
            organizer_id: body.organizer_id,
            max_participants: body.max_participants,
            min_participants: body.min_participants,
            start_time: body.start_time,
            prize_pool: body.prize_pool,
            seeding: body.seeding,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct JoinBody {
    user_id: UserId,
    #[serde(default)]
    seed: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinResponse {
    participant: Participant,
    participant_count: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedBody {
    seed: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ResultBody {
    winner_participant_id: ParticipantId,
}

#[derive(Serialize)]
struct AdvanceResponse {
    advanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    round: Option<Round>,
    #[serde(skip_serializing_if = "Option::is_none")]
    champion: Option<ParticipantId>,
}

impl From<Advance> for AdvanceResponse {
    fn from(advance: Advance) -> Self {
        match advance {
            Advance::NotReady => Self {
                advanced: false,
                round: None,
                champion: None,
            },
            Advance::NextRound(round) => Self {
                advanced: true,
                round: Some(round),
                champion: None,
            },
            Advance::Completed { champion } => Self {
                advanced: true,
                round: None,
                champion: Some(champion),
            },
        }
    }
}

#[derive(Deserialize)]
struct ListQuery {
    status: Option<TournamentStatus>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id.
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tcg-bracket-web",
    })
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> ApiResult {
    let tournament = state.create(body.into_inner().into())?;
    Ok(HttpResponse::Created().json(tournament))
}

/// List tournaments, optionally filtered with `?status=upcoming`.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, query: Query<ListQuery>) -> HttpResponse {
    HttpResponse::Ok().json(state.list(query.status))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.get(path.id)?))
}

/// Edit tournament fields; which fields are accepted depends on status.
#[patch("/api/tournaments/{id}")]
async fn api_edit_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentPatch>,
) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.edit(path.id, body.into_inner())?))
}

#[post("/api/tournaments/{id}/join")]
async fn api_join_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<JoinBody>,
) -> ApiResult {
    let registration = state.join(path.id, &body.user_id, body.seed)?;
    Ok(HttpResponse::Ok().json(JoinResponse {
        participant: registration.participant,
        participant_count: registration.participant_count,
    }))
}

#[get("/api/tournaments/{id}/participants")]
async fn api_list_participants(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.get(path.id)?.participants))
}

/// Withdraw a participant (Upcoming only).
#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_withdraw_participant(
    state: AppState,
    path: Path<TournamentParticipantPath>,
) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.withdraw(path.id, path.participant_id)?))
}

#[put("/api/tournaments/{id}/participants/{participant_id}/seed")]
async fn api_set_seed(
    state: AppState,
    path: Path<TournamentParticipantPath>,
    body: Json<SeedBody>,
) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.set_seed(path.id, path.participant_id, body.seed)?))
}

/// Start the tournament (Upcoming -> Active); responds with round 1.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.start(path.id)?))
}

#[get("/api/tournaments/{id}/rounds")]
async fn api_list_rounds(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.get(path.id)?.rounds))
}

#[post("/api/tournaments/{id}/advance")]
async fn api_advance_round(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    let advance = state.advance(path.id)?;
    Ok(HttpResponse::Ok().json(AdvanceResponse::from(advance)))
}

#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel_tournament(state: AppState, path: Path<TournamentPath>) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.cancel(path.id)?))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.get_match(path.id)?))
}

#[post("/api/matches/{id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ResultBody>,
) -> ApiResult {
    Ok(HttpResponse::Ok().json(state.report_result(path.id, body.winner_participant_id)?))
}

/// Malformed bodies, paths and queries get the same error shape as engine errors.
fn bad_request<E: std::fmt::Display>(err: E, _req: &HttpRequest) -> error::Error {
    TournamentError::Validation(err.to_string()).into()
}

/// Register every route and the request extractor configs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(bad_request::<error::JsonPayloadError>))
        .app_data(web::PathConfig::default().error_handler(bad_request::<error::PathError>))
        .app_data(
            web::QueryConfig::default().error_handler(bad_request::<error::QueryPayloadError>),
        )
        .service(api_health)
        .service(api_create_tournament)
        .service(api_list_tournaments)
        .service(api_get_tournament)
        .service(api_edit_tournament)
        .service(api_join_tournament)
        .service(api_list_participants)
        .service(api_withdraw_participant)
        .service(api_set_seed)
        .service(api_start_tournament)
        .service(api_list_rounds)
        .service(api_advance_round)
        .service(api_cancel_tournament)
        .service(api_get_match)
        .service(api_report_result);
}
