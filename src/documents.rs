//! The user account collection.
//!
//! Accounts are schemaless documents looked up by email. The collection does
//! not enforce email uniqueness, callers check before inserting.

use std::sync::Mutex;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Pool;
use crate::schema::user_document;
use crate::web::errors::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub clearance: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub id: String,
    pub created_at: NaiveDateTime,
    pub document: UserDocument,
}

pub trait UserCollection: Send + Sync {
    /// Every document whose email matches exactly, in store order.
    fn find_by_email(&self, email: &str) -> ServiceResult<Vec<StoredUser>>;

    /// Inserts the document and returns its store-assigned id.
    fn add(&self, user: &UserDocument) -> ServiceResult<String>;
}

/// Documents kept as JSONB in `myuser_schema.user_document`.
#[derive(Clone)]
pub struct PgUserCollection {
    pool: Pool,
}

#[derive(QueryableByName)]
#[table_name = "user_document"]
struct DocumentRow {
    id: Uuid,
    body: serde_json::Value,
    created_at: NaiveDateTime,
}

impl PgUserCollection {
    pub fn new(pool: Pool) -> Self {
        PgUserCollection { pool }
    }
}

impl UserCollection for PgUserCollection {
    fn find_by_email(&self, email: &str) -> ServiceResult<Vec<StoredUser>> {
        let conn = self.pool.get()?;

        let rows = diesel::sql_query(
            "SELECT id, body, created_at FROM myuser_schema.user_document WHERE body ->> 'email' = $1 ORDER BY created_at, id"
        )
            .bind::<Text, _>(email)
            .load::<DocumentRow>(&conn)?;

        rows.into_iter()
            .map(|row| Ok(StoredUser {
                id: row.id.to_string(),
                created_at: row.created_at,
                document: serde_json::from_value(row.body)?,
            }))
            .collect()
    }

    fn add(&self, user: &UserDocument) -> ServiceResult<String> {
        use crate::schema::user_document::dsl;

        let id = Uuid::new_v4();
        let body = serde_json::to_value(user)?;
        let conn = self.pool.get()?;

        diesel::insert_into(dsl::user_document)
            .values((dsl::id.eq(id), dsl::body.eq(body)))
            .execute(&conn)?;

        debug!("Stored user document {}", id);
        Ok(id.to_string())
    }
}

/// In-process collection, contents are lost on restart.
#[derive(Default)]
pub struct MemoryUserCollection {
    documents: Mutex<Vec<StoredUser>>,
}

impl MemoryUserCollection {
    pub fn count(&self) -> ServiceResult<usize> {
        Ok(self.documents.lock().map_err(poisoned)?.len())
    }
}

fn poisoned<T>(_: T) -> ServiceError {
    ServiceError::InternalServerError("User collection lock poisoned".to_string())
}

impl UserCollection for MemoryUserCollection {
    fn find_by_email(&self, email: &str) -> ServiceResult<Vec<StoredUser>> {
        let docs = self.documents.lock().map_err(poisoned)?;
        Ok(docs.iter()
            .filter(|x| x.document.email == email)
            .cloned()
            .collect())
    }

    fn add(&self, user: &UserDocument) -> ServiceResult<String> {
        let id = Uuid::new_v4().to_string();
        self.documents.lock().map_err(poisoned)?.push(StoredUser {
            id: id.clone(),
            created_at: Utc::now().naive_utc(),
            document: user.clone(),
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn user(email: &str, password: &str) -> UserDocument {
        UserDocument {
            name: Some("Anna".to_string()),
            email: email.to_string(),
            password: password.to_string(),
            clearance: Some(2),
        }
    }

    #[test]
    fn memory_lookup_keeps_insertion_order() {
        let users = MemoryUserCollection::default();
        assert_eq!(users.count().unwrap(), 0);

        let first = users.add(&user("a@river.org", "one")).unwrap();
        users.add(&user("b@river.org", "two")).unwrap();
        let third = users.add(&user("a@river.org", "three")).unwrap();
        assert_ne!(first, third);
        assert_eq!(users.count().unwrap(), 3);

        let found = users.find_by_email("a@river.org").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, first);
        assert_eq!(found[0].document.password, "one");
        assert_eq!(found[1].id, third);
        assert!(found[0].created_at <= found[1].created_at);

        assert!(users.find_by_email("nobody@river.org").unwrap().is_empty());
    }

    #[test]
    fn poisoned_lock_is_an_error() {
        let users = Arc::new(MemoryUserCollection::default());
        users.add(&user("a@river.org", "one")).unwrap();

        let holder = users.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.documents.lock().unwrap();
            panic!("writer crashed");
        }).join();

        assert!(users.count().is_err());
        assert!(users.find_by_email("a@river.org").is_err());
        assert!(users.add(&user("b@river.org", "two")).is_err());
    }

    #[test]
    fn documents_without_optional_fields() {
        let doc: UserDocument = serde_json::from_str(
            r#"{ "email": "old@river.org", "password": "pw" }"#
        ).unwrap();
        assert_eq!(doc.name, None);
        assert_eq!(doc.clearance, None);
    }
}
