// Every table lives in the `myuser_schema` namespace, see migrations/

table! {
    myuser_schema.excel_data (id) {
        id -> Int4,
        state_name -> Nullable<Varchar>,
        district_name -> Nullable<Varchar>,
        factory_name -> Nullable<Varchar>,
        bod -> Nullable<Varchar>,
        cod -> Nullable<Varchar>,
        ph -> Nullable<Varchar>,
        nitrate -> Nullable<Varchar>,
        #[sql_name = "do"]
        dissolved_oxygen -> Nullable<Varchar>,
        tds -> Nullable<Varchar>,
        zone -> Nullable<Varchar>,
    }
}

table! {
    myuser_schema.users (id) {
        id -> Int4,
        email -> Varchar,
        clearance -> Int4,
    }
}

table! {
    myuser_schema.factories (id) {
        id -> Int4,
        factory_name -> Varchar,
        license_number -> Varchar,
        waste_type -> Varchar,
        discharge_method -> Varchar,
        location_coordinates -> Varchar,
        registered_by -> Varchar,
        license_document -> Nullable<Varchar>,
    }
}

table! {
    myuser_schema.chart_data (id) {
        id -> Int4,
        label -> Varchar,
        bad -> Float8,
        moderate -> Float8,
        good -> Float8,
    }
}

table! {
    myuser_schema.user_document (id) {
        id -> Uuid,
        body -> Jsonb,
        created_at -> Timestamp,
    }
}

allow_tables_to_appear_in_same_query!(
    chart_data,
    excel_data,
    factories,
    user_document,
    users,
);
