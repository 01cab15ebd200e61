use crate::domain::entities::{
    Collection, DeleteResult, DocumentFilter, DocumentId, Fields, InsertOneResult, SetFields,
    StoredDocument, UpdateResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::DocumentRepository;
use crate::infrastructure::observability::DOCUMENT_OPERATIONS;
use crate::infrastructure::persistence::Database;
use sqlx::{any::AnyRow, Any, QueryBuilder, Row};

fn record_operation(collection: Collection, operation: &'static str) {
    metrics::counter!(
        DOCUMENT_OPERATIONS,
        "collection" => collection.as_str(),
        "operation" => operation
    )
    .increment(1);
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Append the `WHERE` predicate for `filter`, after the collection scope.
fn push_filter(builder: &mut QueryBuilder<'_, Any>, filter: &DocumentFilter) {
    match filter {
        DocumentFilter::All => {}
        DocumentFilter::Id(id) => {
            builder.push(" AND id = ");
            builder.push_bind(id.to_hex());
        }
        DocumentFilter::FieldEquals { path, value } => {
            builder.push(" AND json_extract(body, ");
            builder.push_bind(path.to_json_path());
            builder.push(") = ");
            builder.push_bind(value.clone());
        }
    }
}

/// Path/value pairs per `json_set` call, well under SQLite's function
/// argument limit.
const SET_PAIRS_PER_CALL: usize = 40;

/// `json_set(json_set(<base>, path, json(value), ...), ...)`, one call per
/// chunk of `SET_PAIRS_PER_CALL` pairs.
fn push_set_expression(builder: &mut QueryBuilder<'_, Any>, base: &str, set: &SetFields) {
    let chunks: Vec<_> = set.entries().chunks(SET_PAIRS_PER_CALL).collect();

    for _ in &chunks {
        builder.push("json_set(");
    }
    builder.push(base);
    for chunk in chunks {
        for (path, value) in chunk {
            builder.push(", ");
            builder.push_bind(path.to_json_path());
            builder.push(", json(");
            builder.push_bind(value.to_string());
            builder.push(")");
        }
        builder.push(")");
    }
}

fn decode_row(row: &AnyRow) -> DomainResult<StoredDocument> {
    let id: String = row.try_get("id")?;
    let body: String = row.try_get("body")?;
    let fields: Fields = serde_json::from_str(&body)
        .map_err(|e| DomainError::Storage(format!("Corrupt document {}: {}", id, e)))?;

    Ok(StoredDocument {
        id: DocumentId::parse(&id)?,
        fields,
    })
}

impl Database {
    async fn document_exists(&self, collection: Collection, id: &DocumentId) -> DomainResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM documents WHERE collection = ? AND id = ?",
        )
        .bind(collection.as_str().to_string())
        .bind(id.to_hex())
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    /// Apply `set` only when it changes the stored body. Returns rows touched.
    async fn set_if_changed(
        &self,
        collection: Collection,
        id: &DocumentId,
        set: &SetFields,
    ) -> DomainResult<u64> {
        let mut builder = QueryBuilder::<Any>::new("UPDATE documents SET body = ");
        push_set_expression(&mut builder, "body", set);
        builder.push(", updated_at = ");
        builder.push_bind(now());
        builder.push(" WHERE collection = ");
        builder.push_bind(collection.as_str().to_string());
        builder.push(" AND id = ");
        builder.push_bind(id.to_hex());
        builder.push(" AND body <> ");
        push_set_expression(&mut builder, "body", set);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Create the document from `set` alone unless the id is already taken.
    async fn insert_from_set(
        &self,
        collection: Collection,
        id: &DocumentId,
        set: &SetFields,
    ) -> DomainResult<u64> {
        let timestamp = now();
        let mut builder = QueryBuilder::<Any>::new(
            "INSERT INTO documents (collection, id, body, created_at, updated_at) VALUES (",
        );
        builder.push_bind(collection.as_str().to_string());
        builder.push(", ");
        builder.push_bind(id.to_hex());
        builder.push(", ");
        push_set_expression(&mut builder, "'{}'", set);
        builder.push(", ");
        builder.push_bind(timestamp.clone());
        builder.push(", ");
        builder.push_bind(timestamp);
        builder.push(") ON CONFLICT (collection, id) DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl DocumentRepository for Database {
    #[tracing::instrument(skip_all, fields(collection = %collection))]
    async fn find(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
    ) -> DomainResult<Vec<StoredDocument>> {
        record_operation(collection, "find");

        let mut builder =
            QueryBuilder::<Any>::new("SELECT id, body FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str().to_string());
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY seq");

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            documents.push(decode_row(row)?);
        }

        tracing::debug!(
            "find on {} matched {} documents ({:?})",
            collection,
            documents.len(),
            filter
        );
        Ok(documents)
    }

    #[tracing::instrument(skip_all, fields(collection = %collection))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &DocumentFilter,
    ) -> DomainResult<Option<StoredDocument>> {
        record_operation(collection, "find_one");

        let mut builder =
            QueryBuilder::<Any>::new("SELECT id, body FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str().to_string());
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY seq LIMIT 1");

        let row = builder.build().fetch_optional(&self.pool).await?;

        match row {
            Some(row) => Ok(Some(decode_row(&row)?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip_all, fields(collection = %collection))]
    async fn insert_one(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> DomainResult<InsertOneResult> {
        record_operation(collection, "insert_one");

        let id = DocumentId::generate();
        let body = serde_json::to_string(&fields)
            .map_err(|e| DomainError::InvalidDocument(e.to_string()))?;
        let timestamp = now();

        sqlx::query(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?, ?, json(?), ?, ?)",
        )
        .bind(collection.as_str().to_string())
        .bind(id.to_hex())
        .bind(body)
        .bind(timestamp.clone())
        .bind(timestamp)
        .execute(&self.pool)
        .await?;

        tracing::info!("Document inserted: collection={}, id={}", collection, id);
        Ok(InsertOneResult::new(id))
    }

    #[tracing::instrument(skip_all, fields(collection = %collection, id = %id))]
    async fn update_one(
        &self,
        collection: Collection,
        id: &DocumentId,
        set: &SetFields,
        upsert: bool,
    ) -> DomainResult<UpdateResult> {
        record_operation(collection, "update_one");

        if set.is_empty() {
            return Err(DomainError::InvalidDocument(
                "update must set at least one field".to_string(),
            ));
        }

        if self.set_if_changed(collection, id, set).await? > 0 {
            tracing::info!("Document updated: collection={}, id={}", collection, id);
            return Ok(UpdateResult::matched(true));
        }

        if self.document_exists(collection, id).await? {
            tracing::debug!("Document unchanged: collection={}, id={}", collection, id);
            return Ok(UpdateResult::matched(false));
        }

        if !upsert {
            return Ok(UpdateResult::unmatched());
        }

        if self.insert_from_set(collection, id, set).await? > 0 {
            tracing::info!("Document upserted: collection={}, id={}", collection, id);
            return Ok(UpdateResult::upserted(*id));
        }

        // Lost the insert to a concurrent writer; the document exists now.
        let modified = self.set_if_changed(collection, id, set).await? > 0;
        Ok(UpdateResult::matched(modified))
    }

    #[tracing::instrument(skip_all, fields(collection = %collection, id = %id))]
    async fn delete_one(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> DomainResult<DeleteResult> {
        record_operation(collection, "delete_one");

        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str().to_string())
            .bind(id.to_hex())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected();
        tracing::info!(
            "Document delete: collection={}, id={}, deleted={}",
            collection,
            id,
            deleted
        );
        Ok(DeleteResult::new(deleted))
    }

    async fn count(&self, collection: Collection) -> DomainResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM documents WHERE collection = ?")
            .bind(collection.as_str().to_string())
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_of(count: usize) -> SetFields {
        let fields: Fields = (0..count)
            .map(|i| (format!("field_{}", i), json!(i)))
            .collect();
        SetFields::from_fields(fields).unwrap()
    }

    #[test]
    fn test_small_set_uses_single_json_set_call() {
        let mut builder = QueryBuilder::<Any>::new("");
        push_set_expression(&mut builder, "body", &set_of(3));
        let sql = builder.sql();
        assert_eq!(sql.matches("json_set(").count(), 1);
        assert!(sql.starts_with("json_set(body, "));
    }

    #[test]
    fn test_large_set_is_split_into_nested_calls() {
        let mut builder = QueryBuilder::<Any>::new("");
        push_set_expression(&mut builder, "body", &set_of(90));
        let sql = builder.sql();
        assert_eq!(sql.matches("json_set(").count(), 3);
        assert!(sql.starts_with("json_set(json_set(json_set(body, "));
        assert_eq!(sql.matches('(').count(), sql.matches(')').count());
    }
}
