use actix_web::{HttpResponse, web};
use log::debug;
use serde_json::json;

use crate::AppData;
use crate::models::{ChartBucketChanges, ChartBucketInput, IdType, NewChartBucket};

use super::db_helper::{delete_chart_bucket, insert_chart_bucket, load_chart_buckets, update_chart_bucket};
use super::errors::{ServiceError, ServiceResult};

pub async fn list_chart_data(ctx: web::Data<AppData>) -> ServiceResult<HttpResponse> {
    let buckets = web::block(move || {
        let conn = ctx.pool.get()?;
        load_chart_buckets(&conn)
    })
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to fetch chart data"))?;

    Ok(HttpResponse::Ok().json(json!({ "data": buckets })))
}

pub async fn add_chart_data(ctx: web::Data<AppData>, data: web::Json<ChartBucketInput>) -> ServiceResult<HttpResponse> {
    let bucket = NewChartBucket::from(data.into_inner());

    let created = web::block(move || {
        let conn = ctx.pool.get()?;
        insert_chart_bucket(&conn, &bucket)
    })
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to add chart data"))?;

    debug!("Created chart bucket {}", created.id);
    Ok(HttpResponse::Created().json(json!({ "message": "Chart data added successfully" })))
}

pub async fn update_chart_data(
    ctx: web::Data<AppData>,
    bucket_id: web::Path<IdType>,
    data: web::Json<ChartBucketChanges>,
) -> ServiceResult<HttpResponse> {
    let bucket_id = *bucket_id;
    let changes = data.into_inner();

    web::block(move || {
        let conn = ctx.pool.get()?;
        update_chart_bucket(&conn, bucket_id, &changes)
    })
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to update chart data"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Chart data updated successfully" })))
}

pub async fn delete_chart_data(ctx: web::Data<AppData>, bucket_id: web::Path<IdType>) -> ServiceResult<HttpResponse> {
    let bucket_id = *bucket_id;

    web::block(move || {
        let conn = ctx.pool.get()?;
        delete_chart_bucket(&conn, bucket_id)
    })
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to delete chart data"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Chart data deleted successfully" })))
}
