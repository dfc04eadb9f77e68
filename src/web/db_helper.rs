use diesel::{PgConnection, prelude::*};

use crate::models::{ChartBucket, ChartBucketChanges, IdType, MonitoringRecord, MonitoringRecordChanges,
                    NewChartBucket, NewMonitoringRecord};
use crate::web::errors::{ServiceError, ServiceResult};

// Postgres caps a statement at 65535 bind parameters, ten per row
const INSERT_CHUNK_ROWS: usize = 1000;

fn found<T>(row: Option<T>) -> ServiceResult<T> {
    row.ok_or_else(|| ServiceError::NotFound("Record".to_string()))
}

/// Single-row writes addressed by primary key touch one row or none.
fn touched_one(count: usize) -> ServiceResult<()> {
    if count == 1 {
        Ok(())
    } else {
        Err(ServiceError::NotFound("Record".to_string()))
    }
}

pub fn load_monitoring_records(conn: &PgConnection) -> ServiceResult<Vec<MonitoringRecord>> {
    use crate::schema::excel_data::dsl;

    Ok(dsl::excel_data
        .order(dsl::id.asc())
        .load::<MonitoringRecord>(conn)?)
}

/// Stores every record in a single transaction, either all of them are
/// committed or none.
pub fn insert_monitoring_records(conn: &PgConnection, records: &[NewMonitoringRecord]) -> ServiceResult<usize> {
    use crate::schema::excel_data::dsl;

    conn.transaction::<_, ServiceError, _>(|| {
        let mut inserted = 0;
        for chunk in records.chunks(INSERT_CHUNK_ROWS) {
            inserted += diesel::insert_into(dsl::excel_data)
                .values(chunk)
                .execute(conn)?;
        }
        Ok(inserted)
    })
}

pub fn update_monitoring_record(conn: &PgConnection, id: IdType, changes: &MonitoringRecordChanges) -> ServiceResult<()> {
    use crate::schema::excel_data::dsl;

    if changes.is_empty() {
        let found = dsl::excel_data.find(id)
            .select(dsl::id)
            .first::<IdType>(conn)
            .optional()?;
        return self::found(found).map(|_| ());
    }

    let updated = diesel::update(dsl::excel_data.find(id))
        .set(changes)
        .execute(conn)?;
    touched_one(updated)
}

pub fn load_chart_buckets(conn: &PgConnection) -> ServiceResult<Vec<ChartBucket>> {
    use crate::schema::chart_data::dsl;

    Ok(dsl::chart_data
        .order(dsl::id.asc())
        .load::<ChartBucket>(conn)?)
}

pub fn insert_chart_bucket(conn: &PgConnection, bucket: &NewChartBucket) -> ServiceResult<ChartBucket> {
    use crate::schema::chart_data::dsl;

    Ok(diesel::insert_into(dsl::chart_data)
        .values(bucket)
        .get_result(conn)?)
}

pub fn update_chart_bucket(conn: &PgConnection, id: IdType, changes: &ChartBucketChanges) -> ServiceResult<ChartBucket> {
    use crate::schema::chart_data::dsl;

    let bucket = if changes.is_empty() {
        dsl::chart_data.find(id).first::<ChartBucket>(conn).optional()?
    } else {
        diesel::update(dsl::chart_data.find(id))
            .set(changes)
            .get_result::<ChartBucket>(conn)
            .optional()?
    };

    found(bucket)
}

pub fn delete_chart_bucket(conn: &PgConnection, id: IdType) -> ServiceResult<()> {
    use crate::schema::chart_data::dsl;

    let del_count = diesel::delete(dsl::chart_data.find(id))
        .execute(conn)?;
    touched_one(del_count)
}
