use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use states_core::funfacts::{parse_create_payload, parse_remove_payload, parse_replace_payload};
use states_core::projections::{AdmissionView, CapitalView, NicknameView, PopulationView};
use states_core::{Contiguity, FunFactEntry, MergedStateView, RandomFunFact};

use super::fallback;
use crate::error::Error;
use crate::service::{ServiceResult, StatesService};

/// Query pairs are read as a list so a repeated key never fails the request.
type QueryPairs = Vec<(String, String)>;

/// A filter applies only when `contig` appears exactly once.
fn contiguity_filter(pairs: &QueryPairs) -> Option<Contiguity> {
    let mut values = pairs
        .iter()
        .filter(|(key, _)| key == "contig")
        .map(|(_, value)| value.as_str());
    match (values.next(), values.next()) {
        (Some(value), None) => Contiguity::from_query(Some(value)),
        _ => None,
    }
}

/// An empty body reads as `null` so the payload rules report the missing field.
fn parse_body(body: &Bytes) -> ServiceResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|_| Error::from(states_core::Error::validation("Request body must be valid JSON")))
}

pub async fn list_states(
    State(service): State<StatesService>,
    Query(pairs): Query<QueryPairs>,
) -> ServiceResult<Json<Vec<MergedStateView>>> {
    Ok(Json(service.merged_list(contiguity_filter(&pairs)).await?))
}

pub async fn get_state(
    State(service): State<StatesService>,
    Path(state): Path<String>,
) -> ServiceResult<Json<MergedStateView>> {
    Ok(Json(service.merged_single(&state).await?))
}

pub async fn random_fun_fact(
    State(service): State<StatesService>,
    Path(state): Path<String>,
) -> ServiceResult<Json<RandomFunFact>> {
    Ok(Json(service.random_fun_fact(&state).await?))
}

pub async fn create_fun_facts(
    State(service): State<StatesService>,
    Path(state): Path<String>,
    body: Bytes,
) -> ServiceResult<(StatusCode, Json<FunFactEntry>)> {
    let record = service.resolve(&state)?;
    let facts = parse_create_payload(&parse_body(&body)?)?;
    let entry = service
        .mutate(record, states_core::FunFactMutation::Append(facts))
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn replace_fun_fact(
    State(service): State<StatesService>,
    Path(state): Path<String>,
    body: Bytes,
) -> ServiceResult<Json<FunFactEntry>> {
    let record = service.resolve(&state)?;
    let mutation = parse_replace_payload(&parse_body(&body)?)?;
    Ok(Json(service.mutate(record, mutation).await?))
}

pub async fn delete_fun_fact(
    State(service): State<StatesService>,
    Path(state): Path<String>,
    body: Bytes,
) -> ServiceResult<Json<FunFactEntry>> {
    let record = service.resolve(&state)?;
    let mutation = parse_remove_payload(&parse_body(&body)?)?;
    Ok(Json(service.mutate(record, mutation).await?))
}

pub async fn capital(
    State(service): State<StatesService>,
    Path(state): Path<String>,
) -> ServiceResult<Json<CapitalView>> {
    service.capital(&state).map(Json)
}

pub async fn nickname(
    State(service): State<StatesService>,
    Path(state): Path<String>,
) -> ServiceResult<Json<NicknameView>> {
    service.nickname(&state).map(Json)
}

pub async fn population(
    State(service): State<StatesService>,
    Path(state): Path<String>,
) -> ServiceResult<Json<PopulationView>> {
    service.population(&state).map(Json)
}

pub async fn admission(
    State(service): State<StatesService>,
    Path(state): Path<String>,
) -> ServiceResult<Json<AdmissionView>> {
    service.admission(&state).map(Json)
}

/// Unknown paths under `/states/{state}/` still check the code first.
pub async fn unknown_state_route(
    State(service): State<StatesService>,
    Path((state, _rest)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    match service.resolve(&state) {
        Ok(_) => fallback::not_found(headers).await,
        Err(err) => err.into_response(),
    }
}
