use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use log::info;
use serde_json::json;

use crate::AppData;
use crate::models::{IdType, MonitoringRecordChanges};
use crate::spreadsheet::read_monitoring_records;

use super::db_helper::{insert_monitoring_records, load_monitoring_records, update_monitoring_record};
use super::errors::{ServiceError, ServiceResult};

const FILE_FIELD: &str = "file";

async fn skip_field(field: &mut Field) -> ServiceResult<()> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}

/// Collects the contents of the `file` part, refusing uploads above `limit`.
async fn read_upload(payload: &mut Multipart, limit: usize) -> ServiceResult<Vec<u8>> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let disposition = field.content_disposition();

        if disposition.as_ref().and_then(|x| x.get_name()) != Some(FILE_FIELD) {
            skip_field(&mut field).await?;
            continue;
        }

        let has_filename = disposition.as_ref()
            .and_then(|x| x.get_filename())
            .map(|x| !x.is_empty())
            .unwrap_or(false);
        if !has_filename {
            return Err(ServiceError::BadRequest("No selected file".to_string()));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > limit {
                return Err(ServiceError::BadRequest(format!("File exceeds the {} bytes limit", limit)));
            }
            data.extend_from_slice(&chunk);
        }
        return Ok(data);
    }

    Err(ServiceError::BadRequest("No file part".to_string()))
}

pub async fn upload_excel(ctx: web::Data<AppData>, mut payload: Multipart) -> ServiceResult<HttpResponse> {
    let data = read_upload(&mut payload, ctx.upload_limit).await?;

    let inserted = web::block(move || {
        let records = read_monitoring_records(data)?;
        let conn = ctx.pool.get()?;
        insert_monitoring_records(&conn, &records)
    })
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to process Excel file"))?;

    info!("Stored {} monitoring records", inserted);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Excel file uploaded and data stored successfully."
    })))
}

pub async fn fetch_excel_data(ctx: web::Data<AppData>) -> ServiceResult<HttpResponse> {
    let records = web::block(move || {
        let conn = ctx.pool.get()?;
        load_monitoring_records(&conn)
    })
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to fetch Excel data"))?;

    Ok(HttpResponse::Ok().json(json!({ "data": records })))
}

pub async fn update_excel_data(
    ctx: web::Data<AppData>,
    record_id: web::Path<IdType>,
    data: web::Json<MonitoringRecordChanges>,
) -> ServiceResult<HttpResponse> {
    let record_id = *record_id;
    let changes = data.into_inner();

    web::block(move || {
        let conn = ctx.pool.get()?;
        update_monitoring_record(&conn, record_id, &changes)
    })
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to update Excel data"))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Record updated successfully" })))
}
