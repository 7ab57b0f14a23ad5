//! Postgres-backed store shared by every resource.
//!
//! Statements are assembled with [`QueryBuilder`] from the resource's table
//! name and the column set of each payload. Column names come from static
//! resource descriptors, never from request input.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::ResourceStore;
use crate::{
    error::{AppError, AppResult},
    models::{Columns, Resource},
    pagination::{PageWindow, SearchFilter},
    validation::FieldValue,
};

pub struct PgStore<R> {
    pool: Pool<Postgres>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for PgStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> PgStore<R> {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }
}

fn quoted(column: &str) -> String {
    format!("\"{}\"", column)
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: FieldValue) {
    match value {
        FieldValue::Text(v) => qb.push_bind(v),
        FieldValue::Decimal(v) => qb.push_bind(v),
        FieldValue::Integer(v) => qb.push_bind(v),
        FieldValue::Date(v) => qb.push_bind(v),
        FieldValue::Flag(v) => qb.push_bind(v),
        FieldValue::List(v) => qb.push_bind(v),
    };
}

/// Append `WHERE (a::text ILIKE $n OR b::text ILIKE $n ...)` when searching
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
    let Some(pattern) = filter.like_pattern() else {
        return;
    };
    qb.push(" WHERE (");
    for (i, field) in filter.fields.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(format!("{}::text ILIKE ", quoted(field)));
        qb.push_bind(pattern.clone());
    }
    qb.push(")");
}

/// Map a failed write, turning unique violations into conflicts
fn write_error<R: Resource>(err: sqlx::Error) -> AppError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            let field = R::UNIQUE.unwrap_or("value");
            return AppError::Conflict(format!("{} with this {} already exists", R::LABEL, field));
        }
        if db.is_foreign_key_violation() {
            return AppError::NotFound(format!("Referenced record for {} not found", R::LABEL));
        }
    }
    AppError::Database(err)
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for PgStore<R> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<R::Record>> {
        let query = format!("SELECT * FROM {} WHERE id = $1", R::TABLE);
        let record = sqlx::query_as::<_, R::Record>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_by_unique_field(
        &self,
        field: &'static str,
        value: &FieldValue,
    ) -> AppResult<Option<R::Record>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT * FROM {} WHERE {} = ",
            R::TABLE,
            quoted(field)
        ));
        push_value(&mut qb, value.clone());
        qb.push(" LIMIT 1");

        let record = qb
            .build_query_as::<R::Record>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_many(&self, filter: &SearchFilter, window: PageWindow) -> AppResult<Vec<R::Record>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {}", R::TABLE));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(window.limit);
        qb.push(" OFFSET ");
        qb.push_bind(window.offset);

        let records = qb
            .build_query_as::<R::Record>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn count(&self, filter: &SearchFilter) -> AppResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
        push_filter(&mut qb, filter);

        let (total,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn create(&self, data: &R::Create) -> AppResult<R::Record> {
        let columns = data.columns();

        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (", R::TABLE));
        let names: Vec<String> = columns.iter().map(|(name, _)| quoted(name)).collect();
        qb.push(names.join(", "));
        qb.push(") VALUES (");
        for (i, (_, value)) in columns.into_iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value);
        }
        qb.push(") RETURNING *");

        qb.build_query_as::<R::Record>()
            .fetch_one(&self.pool)
            .await
            .map_err(write_error::<R>)
    }

    async fn update(&self, id: i32, patch: &R::Patch) -> AppResult<R::Record> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", R::TABLE));
        for (name, value) in patch.columns() {
            qb.push(format!("{} = ", quoted(name)));
            push_value(&mut qb, value);
            qb.push(", ");
        }
        qb.push("updated_at = NOW() WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");

        qb.build_query_as::<R::Record>()
            .fetch_optional(&self.pool)
            .await
            .map_err(write_error::<R>)?
            .ok_or_else(|| AppError::NotFound(format!("{} with id {} not found", R::LABEL, id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let query = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} with id {} not found", R::LABEL, id)));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
