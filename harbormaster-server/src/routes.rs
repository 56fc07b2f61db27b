//! HTTP handlers for the Harbormaster server.

use actix_web::{HttpResponse, Responder, get, post, put, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::{Equipment, NewEquipment, NewEquipmentCost, NewVessel};
use crate::openapi::ApiDoc;
use crate::store;

/// Maximum length of a human-assigned equipment code.
const MAX_EQUIPMENT_CODE_LEN: usize = 8;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Generic acknowledgement payload for write endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Acknowledgement message.
    pub message: String,
}

impl MessageResponse {
    fn ok() -> Self {
        Self {
            message: "OK".to_string(),
        }
    }
}

/// Request payload for registering a vessel.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VesselInsertRequest {
    /// Unique vessel code.
    pub code: Option<String>,
}

/// Request payload for registering equipment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquipmentInsertRequest {
    /// Display name.
    pub name: Option<String>,
    /// Unique equipment code, at most 8 characters.
    pub code: Option<String>,
    /// Installation location on the vessel.
    pub location: Option<String>,
    /// Owning vessel id; equipment may be registered unassigned.
    pub vessel_id: Option<i64>,
}

/// Request payload for recording an equipment cost.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CostInsertRequest {
    /// Equipment code the cost is attributed to.
    pub code: Option<String>,
    /// Free-text cost category.
    #[serde(rename = "type")]
    pub category: Option<String>,
    /// Monetary amount as text; `.` and `,` decimal separators accepted.
    pub cost: Option<String>,
}

/// Equipment record as exposed by the listing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquipmentResponse {
    /// System-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique equipment code.
    pub code: String,
    /// Installation location.
    pub location: String,
    /// Whether the equipment is in service.
    pub active: bool,
}

impl From<Equipment> for EquipmentResponse {
    fn from(equipment: Equipment) -> Self {
        Self {
            id: equipment.id,
            name: equipment.name,
            code: equipment.code,
            location: equipment.location,
            active: equipment.active,
        }
    }
}

#[derive(Debug, Deserialize)]
/// Query parameters for bulk deactivation.
pub struct StatusUpdateQuery {
    /// Comma-joined equipment codes.
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Query parameters for the active-equipment listing.
pub struct ActiveEquipmentsQuery {
    /// Vessel code.
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Query parameters for the equipment cost total.
pub struct EquipmentCostQuery {
    /// Equipment code filter.
    pub code: Option<String>,
    /// Equipment name filter; takes precedence over `code`.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Query parameters for the vessel cost average.
pub struct VesselCostQuery {
    /// Vessel code.
    pub code: Option<String>,
}

enum CostSelector {
    Code(String),
    Name(String),
}

/// Extract a required, non-blank string field.
fn required_field(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ApiError::Validation(format!("{name} is required"))),
    }
}

/// Parse a cost amount from text, accepting `.` or `,` as decimal separator.
fn parse_amount(raw: &str) -> Result<f64, ApiError> {
    let normalized = raw.trim().replace(',', ".");
    let amount: f64 = normalized
        .parse()
        .map_err(|_| ApiError::Validation(format!("invalid cost amount: {raw}")))?;
    if !amount.is_finite() {
        return Err(ApiError::Validation(format!("invalid cost amount: {raw}")));
    }
    Ok(amount)
}

/// Register every Harbormaster service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(insert_vessel)
        .service(insert_equipment)
        .service(insert_equipment_cost)
        .service(update_equipment_status)
        .service(active_equipments)
        .service(equipment_cost_total)
        .service(vessel_cost_average)
        .service(openapi_json);
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is alive", body = String)
    ),
    tag = "health"
)]
#[get("/")]
/// Liveness check.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

#[utoipa::path(
    post,
    path = "/insert_vessel",
    request_body = VesselInsertRequest,
    responses(
        (status = 201, description = "Vessel registered", body = MessageResponse),
        (status = 400, description = "Missing code", body = ErrorResponse),
        (status = 409, description = "Vessel already exists", body = ErrorResponse)
    ),
    tag = "vessels"
)]
#[post("/insert_vessel")]
/// Register a new vessel.
pub async fn insert_vessel(
    state: web::Data<AppState>,
    payload: web::Json<VesselInsertRequest>,
) -> Result<HttpResponse, ApiError> {
    let code = required_field(payload.into_inner().code, "code")?;
    let pool = state.pool.clone();
    web::block(move || {
        let mut conn = pool.get()?;
        if store::find_vessel_by_code(&mut conn, &code)?.is_some() {
            return Err(ApiError::Conflict("vessel already exists".to_string()));
        }
        store::insert_vessel(
            &mut conn,
            &NewVessel {
                code,
                created_at: Utc::now().naive_utc(),
            },
        )
    })
    .await??;
    Ok(HttpResponse::Created().json(MessageResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/insert_equipment",
    request_body = EquipmentInsertRequest,
    responses(
        (status = 201, description = "Equipment registered", body = MessageResponse),
        (status = 400, description = "Missing field, oversize code, or unknown vessel", body = ErrorResponse),
        (status = 409, description = "Equipment already exists", body = ErrorResponse)
    ),
    tag = "equipments"
)]
#[post("/insert_equipment")]
/// Register a new piece of equipment, active by default.
pub async fn insert_equipment(
    state: web::Data<AppState>,
    payload: web::Json<EquipmentInsertRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let name = required_field(payload.name, "name")?;
    let code = required_field(payload.code, "code")?;
    let location = required_field(payload.location, "location")?;
    if code.chars().count() > MAX_EQUIPMENT_CODE_LEN {
        return Err(ApiError::Validation(format!(
            "code must be at most {MAX_EQUIPMENT_CODE_LEN} characters"
        )));
    }
    let vessel_id = payload.vessel_id;
    let pool = state.pool.clone();
    web::block(move || {
        let mut conn = pool.get()?;
        if store::find_equipment_by_code(&mut conn, &code)?.is_some() {
            return Err(ApiError::Conflict("equipment already exists".to_string()));
        }
        // No vessel existence pre-check: a dangling vessel_id is rejected by
        // the foreign key and mapped to a validation error.
        store::insert_equipment(
            &mut conn,
            &NewEquipment {
                vessel_id,
                name,
                code,
                location,
                active: true,
                created_at: Utc::now().naive_utc(),
            },
        )
    })
    .await??;
    Ok(HttpResponse::Created().json(MessageResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/insert_equipment_cost",
    request_body = CostInsertRequest,
    responses(
        (status = 201, description = "Cost recorded", body = MessageResponse),
        (status = 400, description = "Missing field, malformed amount, or unknown equipment", body = ErrorResponse)
    ),
    tag = "equipments"
)]
#[post("/insert_equipment_cost")]
/// Record a cost against an equipment code.
pub async fn insert_equipment_cost(
    state: web::Data<AppState>,
    payload: web::Json<CostInsertRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let equipment_code = required_field(payload.code, "code")?;
    let category = required_field(payload.category, "type")?;
    let raw_amount = required_field(payload.cost, "cost")?;
    let amount = parse_amount(&raw_amount)?;
    let pool = state.pool.clone();
    web::block(move || {
        let mut conn = pool.get()?;
        store::insert_cost(
            &mut conn,
            &NewEquipmentCost {
                equipment_code,
                category,
                amount,
                created_at: Utc::now().naive_utc(),
            },
        )
    })
    .await??;
    Ok(HttpResponse::Created().json(MessageResponse::ok()))
}

#[utoipa::path(
    put,
    path = "/update_equipment_status",
    params(
        ("code" = String, Query, description = "Comma-joined equipment codes to deactivate")
    ),
    responses(
        (status = 201, description = "Matching equipment deactivated", body = MessageResponse),
        (status = 400, description = "Missing code parameter", body = ErrorResponse)
    ),
    tag = "equipments"
)]
#[put("/update_equipment_status")]
/// Deactivate a list of equipment codes; unknown codes are skipped.
pub async fn update_equipment_status(
    state: web::Data<AppState>,
    query: web::Query<StatusUpdateQuery>,
) -> Result<HttpResponse, ApiError> {
    let raw = query
        .into_inner()
        .code
        .ok_or_else(|| ApiError::Validation("code query parameter is required".to_string()))?;
    let codes: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(String::from)
        .collect();
    let pool = state.pool.clone();
    let updated = web::block(move || {
        let mut conn = pool.get()?;
        store::deactivate_equipments(&mut conn, &codes)
    })
    .await??;
    log::info!("deactivated {updated} equipment row(s)");
    Ok(HttpResponse::Created().json(MessageResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/active_equipments",
    params(
        ("code" = String, Query, description = "Vessel code")
    ),
    responses(
        (status = 200, description = "Active equipment, in insertion order", body = [EquipmentResponse]),
        (status = 400, description = "Missing code parameter", body = ErrorResponse)
    ),
    tag = "vessels"
)]
#[get("/active_equipments")]
/// List the active equipment installed on a vessel.
pub async fn active_equipments(
    state: web::Data<AppState>,
    query: web::Query<ActiveEquipmentsQuery>,
) -> Result<HttpResponse, ApiError> {
    let code = required_field(query.into_inner().code, "code")?;
    let pool = state.pool.clone();
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        store::active_equipments_for_vessel(&mut conn, &code)
    })
    .await??;
    let body: Vec<EquipmentResponse> = rows.into_iter().map(EquipmentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/equipment/cost",
    params(
        ("code" = Option<String>, Query, description = "Equipment code filter"),
        ("name" = Option<String>, Query, description = "Equipment name filter; wins over code")
    ),
    responses(
        (status = 200, description = "Total cost; 0 when no records match", body = f64),
        (status = 400, description = "Neither code nor name supplied", body = ErrorResponse)
    ),
    tag = "equipments"
)]
#[get("/equipment/cost")]
/// Total cost recorded for an equipment, selected by name or code.
pub async fn equipment_cost_total(
    state: web::Data<AppState>,
    query: web::Query<EquipmentCostQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let name = query.name.filter(|value| !value.trim().is_empty());
    let code = query.code.filter(|value| !value.trim().is_empty());
    let selector = match (name, code) {
        (Some(name), _) => CostSelector::Name(name.trim().to_string()),
        (None, Some(code)) => CostSelector::Code(code.trim().to_string()),
        (None, None) => {
            return Err(ApiError::Validation(
                "code or name query parameter is required".to_string(),
            ));
        }
    };
    let pool = state.pool.clone();
    let amounts = web::block(move || {
        let mut conn = pool.get()?;
        match selector {
            CostSelector::Name(name) => store::cost_amounts_by_equipment_name(&mut conn, &name),
            CostSelector::Code(code) => store::cost_amounts_by_equipment_code(&mut conn, &code),
        }
    })
    .await??;
    let total: f64 = amounts.iter().sum();
    Ok(HttpResponse::Ok().json(total))
}

#[utoipa::path(
    get,
    path = "/vessel/cost",
    params(
        ("code" = String, Query, description = "Vessel code")
    ),
    responses(
        (status = 200, description = "Arithmetic mean of the vessel's cost records", body = f64),
        (status = 400, description = "Missing code parameter", body = ErrorResponse),
        (status = 404, description = "No cost records for the vessel", body = ErrorResponse)
    ),
    tag = "vessels"
)]
#[get("/vessel/cost")]
/// Mean cost across every equipment installed on a vessel.
pub async fn vessel_cost_average(
    state: web::Data<AppState>,
    query: web::Query<VesselCostQuery>,
) -> Result<HttpResponse, ApiError> {
    let code = required_field(query.into_inner().code, "code")?;
    let pool = state.pool.clone();
    let lookup_code = code.clone();
    let amounts = web::block(move || {
        let mut conn = pool.get()?;
        store::cost_amounts_for_vessel(&mut conn, &lookup_code)
    })
    .await??;
    if amounts.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no cost records for vessel {code}"
        )));
    }
    let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;
    Ok(HttpResponse::Ok().json(mean))
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "health"
)]
#[get("/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
