//! Database models for the Harbormaster server.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::{equipment_costs, equipments, vessels};

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = vessels)]
/// Vessel database record.
pub struct Vessel {
    /// System-assigned identifier.
    pub id: i64,
    /// Unique human-assigned vessel code.
    pub code: String,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vessels)]
/// Insertable vessel record.
pub struct NewVessel {
    /// Unique human-assigned vessel code.
    pub code: String,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = equipments)]
#[diesel(belongs_to(Vessel, foreign_key = vessel_id))]
/// Equipment database record.
pub struct Equipment {
    /// System-assigned identifier.
    pub id: i64,
    /// Owning vessel, if assigned.
    pub vessel_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Unique human-assigned equipment code (8 chars max).
    pub code: String,
    /// Installation location on the vessel.
    pub location: String,
    /// Whether the equipment is still in service.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = equipments)]
/// Insertable equipment record.
pub struct NewEquipment {
    /// Owning vessel, if assigned.
    pub vessel_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Unique human-assigned equipment code.
    pub code: String,
    /// Installation location on the vessel.
    pub location: String,
    /// Whether the equipment is in service.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = equipment_costs)]
/// Insertable cost record; costs are immutable once written and are only
/// read back as aggregate amounts.
pub struct NewEquipmentCost {
    /// Code of the equipment this cost belongs to.
    pub equipment_code: String,
    /// Free-text cost category.
    pub category: String,
    /// Monetary amount.
    pub amount: f64,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}
