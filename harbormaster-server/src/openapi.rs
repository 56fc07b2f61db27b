//! OpenAPI specification for the Harbormaster server.

use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::routes::{
    CostInsertRequest, EquipmentInsertRequest, EquipmentResponse, MessageResponse,
    VesselInsertRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::insert_vessel,
        crate::routes::insert_equipment,
        crate::routes::insert_equipment_cost,
        crate::routes::update_equipment_status,
        crate::routes::active_equipments,
        crate::routes::equipment_cost_total,
        crate::routes::vessel_cost_average,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            MessageResponse,
            ErrorResponse,
            VesselInsertRequest,
            EquipmentInsertRequest,
            CostInsertRequest,
            EquipmentResponse
        )
    ),
    tags(
        (name = "health", description = "Liveness and system endpoints"),
        (name = "vessels", description = "Vessel registration and aggregates"),
        (name = "equipments", description = "Equipment registration, status, and costs")
    )
)]
/// OpenAPI specification for the Harbormaster server.
pub struct ApiDoc;
