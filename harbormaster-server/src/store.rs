//! Data access layer: per-entity reads and writes against the fleet schema.
//!
//! Handlers compose these operations; nothing here shapes HTTP responses.
//! Cost records join to equipment by code rather than primary key, so those
//! queries carry an explicit `ON` clause.

use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::errors::ApiError;
use crate::models::{Equipment, NewEquipment, NewEquipmentCost, NewVessel, Vessel};
use crate::schema::{equipment_costs, equipments, vessels};

/// Look up a vessel by its unique code.
pub fn find_vessel_by_code(
    conn: &mut PgConnection,
    code: &str,
) -> Result<Option<Vessel>, ApiError> {
    let vessel = vessels::table
        .filter(vessels::code.eq(code))
        .select(Vessel::as_select())
        .first(conn)
        .optional()?;
    Ok(vessel)
}

/// Insert a new vessel row.
pub fn insert_vessel(conn: &mut PgConnection, record: &NewVessel) -> Result<(), ApiError> {
    diesel::insert_into(vessels::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}

/// Look up equipment by its unique code.
pub fn find_equipment_by_code(
    conn: &mut PgConnection,
    code: &str,
) -> Result<Option<Equipment>, ApiError> {
    let equipment = equipments::table
        .filter(equipments::code.eq(code))
        .select(Equipment::as_select())
        .first(conn)
        .optional()?;
    Ok(equipment)
}

/// Insert a new equipment row.
pub fn insert_equipment(conn: &mut PgConnection, record: &NewEquipment) -> Result<(), ApiError> {
    diesel::insert_into(equipments::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}

/// Flip `active` to false for every equipment whose code is in `codes`.
///
/// Unknown codes simply match nothing; the returned count is the number of
/// rows actually updated.
pub fn deactivate_equipments(conn: &mut PgConnection, codes: &[String]) -> Result<usize, ApiError> {
    let updated = diesel::update(equipments::table.filter(equipments::code.eq_any(codes)))
        .set(equipments::active.eq(false))
        .execute(conn)?;
    Ok(updated)
}

/// List active equipment installed on the vessel with the given code.
///
/// Rows come back in equipment id order, i.e. insertion order.
pub fn active_equipments_for_vessel(
    conn: &mut PgConnection,
    vessel_code: &str,
) -> Result<Vec<Equipment>, ApiError> {
    let rows = equipments::table
        .inner_join(vessels::table)
        .filter(vessels::code.eq(vessel_code))
        .filter(equipments::active.eq(true))
        .order(equipments::id.asc())
        .select(Equipment::as_select())
        .load(conn)?;
    Ok(rows)
}

/// Insert a new cost record.
pub fn insert_cost(conn: &mut PgConnection, record: &NewEquipmentCost) -> Result<(), ApiError> {
    diesel::insert_into(equipment_costs::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}

/// Cost amounts for the equipment with the given code.
pub fn cost_amounts_by_equipment_code(
    conn: &mut PgConnection,
    code: &str,
) -> Result<Vec<f64>, ApiError> {
    let amounts = equipment_costs::table
        .inner_join(equipments::table.on(equipment_costs::equipment_code.eq(equipments::code)))
        .filter(equipments::code.eq(code))
        .select(equipment_costs::amount)
        .load(conn)?;
    Ok(amounts)
}

/// Cost amounts for all equipment sharing the given name.
pub fn cost_amounts_by_equipment_name(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Vec<f64>, ApiError> {
    let amounts = equipment_costs::table
        .inner_join(equipments::table.on(equipment_costs::equipment_code.eq(equipments::code)))
        .filter(equipments::name.eq(name))
        .select(equipment_costs::amount)
        .load(conn)?;
    Ok(amounts)
}

/// Cost amounts across every equipment installed on the given vessel.
pub fn cost_amounts_for_vessel(
    conn: &mut PgConnection,
    vessel_code: &str,
) -> Result<Vec<f64>, ApiError> {
    let amounts = equipment_costs::table
        .inner_join(equipments::table.on(equipment_costs::equipment_code.eq(equipments::code)))
        .inner_join(vessels::table.on(equipments::vessel_id.eq(vessels::id.nullable())))
        .filter(vessels::code.eq(vessel_code))
        .select(equipment_costs::amount)
        .load(conn)?;
    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TestDatabase;
    use chrono::Utc;

    fn seed_vessel(conn: &mut PgConnection, code: &str) -> Vessel {
        insert_vessel(
            conn,
            &NewVessel {
                code: code.to_string(),
                created_at: Utc::now().naive_utc(),
            },
        )
        .expect("insert vessel");
        find_vessel_by_code(conn, code)
            .expect("find vessel")
            .expect("vessel present")
    }

    fn seed_equipment(conn: &mut PgConnection, vessel_id: Option<i64>, code: &str, name: &str) {
        insert_equipment(
            conn,
            &NewEquipment {
                vessel_id,
                name: name.to_string(),
                code: code.to_string(),
                location: "engine room".to_string(),
                active: true,
                created_at: Utc::now().naive_utc(),
            },
        )
        .expect("insert equipment");
    }

    fn seed_cost(conn: &mut PgConnection, equipment_code: &str, amount: f64) {
        insert_cost(
            conn,
            &NewEquipmentCost {
                equipment_code: equipment_code.to_string(),
                category: "maintenance".to_string(),
                amount,
                created_at: Utc::now().naive_utc(),
            },
        )
        .expect("insert cost");
    }

    #[test]
    fn deactivate_skips_unknown_codes() {
        let mut test_db = TestDatabase::new();
        let pool = test_db.pool();
        let mut conn = pool.get().expect("conn");

        let vessel = seed_vessel(&mut conn, "MV101");
        seed_equipment(&mut conn, Some(vessel.id), "CP01", "compressor");
        seed_equipment(&mut conn, Some(vessel.id), "CP02", "compressor");

        let updated = deactivate_equipments(
            &mut conn,
            &["CP01".to_string(), "GHOST".to_string()],
        )
        .expect("deactivate");
        assert_eq!(updated, 1);

        let first = find_equipment_by_code(&mut conn, "CP01")
            .expect("find")
            .expect("present");
        assert!(!first.active);
        let second = find_equipment_by_code(&mut conn, "CP02")
            .expect("find")
            .expect("present");
        assert!(second.active);
    }

    #[test]
    fn active_listing_excludes_deactivated_and_other_vessels() {
        let mut test_db = TestDatabase::new();
        let pool = test_db.pool();
        let mut conn = pool.get().expect("conn");

        let alpha = seed_vessel(&mut conn, "ALPHA");
        let bravo = seed_vessel(&mut conn, "BRAVO");
        seed_equipment(&mut conn, Some(alpha.id), "EN01", "main engine");
        seed_equipment(&mut conn, Some(alpha.id), "EN02", "aux engine");
        seed_equipment(&mut conn, Some(bravo.id), "EN03", "main engine");
        deactivate_equipments(&mut conn, &["EN02".to_string()]).expect("deactivate");

        let listing = active_equipments_for_vessel(&mut conn, "ALPHA").expect("listing");
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].code, "EN01");
        assert!(listing[0].active);
    }

    #[test]
    fn vessel_cost_amounts_join_through_equipment() {
        let mut test_db = TestDatabase::new();
        let pool = test_db.pool();
        let mut conn = pool.get().expect("conn");

        let vessel = seed_vessel(&mut conn, "CARGO7");
        seed_equipment(&mut conn, Some(vessel.id), "PU01", "pump");
        seed_equipment(&mut conn, None, "PU02", "spare pump");
        seed_cost(&mut conn, "PU01", 10.5);
        seed_cost(&mut conn, "PU01", 2.5);
        // Unassigned equipment must not contribute to any vessel aggregate.
        seed_cost(&mut conn, "PU02", 99.0);

        let amounts = cost_amounts_for_vessel(&mut conn, "CARGO7").expect("amounts");
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts.iter().sum::<f64>(), 13.0);
    }

    #[test]
    fn equipment_cost_amounts_filter_by_name() {
        let mut test_db = TestDatabase::new();
        let pool = test_db.pool();
        let mut conn = pool.get().expect("conn");

        let vessel = seed_vessel(&mut conn, "TANKER2");
        seed_equipment(&mut conn, Some(vessel.id), "GN01", "generator");
        seed_equipment(&mut conn, Some(vessel.id), "GN02", "generator");
        seed_cost(&mut conn, "GN01", 4.0);
        seed_cost(&mut conn, "GN02", 6.0);

        let by_name = cost_amounts_by_equipment_name(&mut conn, "generator").expect("by name");
        assert_eq!(by_name.len(), 2);

        let by_code = cost_amounts_by_equipment_code(&mut conn, "GN01").expect("by code");
        assert_eq!(by_code, vec![4.0]);
    }
}
