//! Diesel schema definitions for the Harbormaster server.

diesel::table! {
    vessels (id) {
        id -> Int8,
        code -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    equipments (id) {
        id -> Int8,
        vessel_id -> Nullable<Int8>,
        name -> Text,
        #[max_length = 8]
        code -> Varchar,
        location -> Text,
        active -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    equipment_costs (id) {
        id -> Int8,
        #[max_length = 8]
        equipment_code -> Varchar,
        category -> Text,
        amount -> Float8,
        created_at -> Timestamp,
    }
}

diesel::joinable!(equipments -> vessels (vessel_id));

// equipment_costs references equipments by code rather than primary key, so
// queries join it with an explicit `.on(...)` instead of `joinable!`.
diesel::allow_tables_to_appear_in_same_query!(vessels, equipments, equipment_costs);
