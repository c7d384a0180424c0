// src/storage/repository.rs

//! Generic, entity-parametrized repository over SQLite.
//!
//! One repository type serves every stored entity kind: callers compose
//! [`Filter`] predicates (combined with AND) instead of hand-writing SQL
//! per entity. Column names are checked against the entity's column list
//! before they are interpolated into a statement.

use std::collections::VecDeque;
use std::marker::PhantomData;

use futures::stream::Stream;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::FromRow;

use crate::error::{AppError, Result};

/// A stored entity kind: table metadata plus row decoding.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const PRIMARY_KEY: &'static str;
}

/// A typed value bound into a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        v.map_or(Value::Null, Value::Text)
    }
}

/// A filter predicate over one column. Slices of filters combine with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
    Gt(&'static str, Value),
    Ge(&'static str, Value),
    Lt(&'static str, Value),
    Le(&'static str, Value),
}

impl Filter {
    fn column(&self) -> &'static str {
        match self {
            Filter::Eq(col, _)
            | Filter::In(col, _)
            | Filter::Gt(col, _)
            | Filter::Ge(col, _)
            | Filter::Lt(col, _)
            | Filter::Le(col, _) => col,
        }
    }
}

/// Options for [`Repository::get_many`].
#[derive(Debug, Clone, Default)]
pub struct QueryOptions<'a> {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Column to order by; absent means insertion (rowid) order
    pub order_by: Option<&'a str>,
    /// Reverse the stated `order_by`
    pub descending: bool,
    /// Raw join clause appended after the table name
    pub join: Option<&'a str>,
}

/// Outcome of [`Repository::upsert`].
#[derive(Debug)]
pub enum Upsert<E> {
    /// Existing rows matched the filters and were updated
    Updated(u64),
    /// Nothing matched; a new row was created
    Created(E),
}

/// Binds a slice of [`Value`]s onto any sqlx query type in order.
macro_rules! bind_values {
    ($query:expr, $values:expr) => {{
        let mut q = $query;
        for value in $values {
            q = match value {
                Value::Int(v) => q.bind(*v),
                Value::Text(s) => q.bind(s.as_str()),
                Value::Null => q.bind(None::<String>),
            };
        }
        q
    }};
}

/// Render a WHERE fragment and collect bind values in placeholder order.
///
/// An `In` over an empty set matches nothing rather than erroring, so a
/// dedup pass over an empty candidate list stays a single code path.
fn where_clause<'f>(filters: &'f [Filter]) -> (String, Vec<&'f Value>) {
    if filters.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut parts = Vec::with_capacity(filters.len());
    let mut binds = Vec::new();

    for filter in filters {
        match filter {
            Filter::Eq(col, v) => {
                parts.push(format!("{col} = ?"));
                binds.push(v);
            }
            Filter::In(col, vs) => {
                if vs.is_empty() {
                    parts.push("1 = 0".to_string());
                } else {
                    let marks = vec!["?"; vs.len()].join(", ");
                    parts.push(format!("{col} IN ({marks})"));
                    binds.extend(vs.iter());
                }
            }
            Filter::Gt(col, v) => {
                parts.push(format!("{col} > ?"));
                binds.push(v);
            }
            Filter::Ge(col, v) => {
                parts.push(format!("{col} >= ?"));
                binds.push(v);
            }
            Filter::Lt(col, v) => {
                parts.push(format!("{col} < ?"));
                binds.push(v);
            }
            Filter::Le(col, v) => {
                parts.push(format!("{col} <= ?"));
                binds.push(v);
            }
        }
    }

    (format!(" WHERE {}", parts.join(" AND ")), binds)
}

/// Generic repository over a connection pool.
///
/// Stateless apart from the pool handle; cheap to clone and safe to reuse
/// across scrape cycles sequentially.
#[derive(Debug, Clone)]
pub struct Repository<E: Entity> {
    pool: SqlitePool,
    _entity: PhantomData<E>,
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn check_column(column: &str) -> Result<()> {
        if E::COLUMNS.contains(&column) {
            Ok(())
        } else {
            Err(AppError::invalid_argument(format!(
                "unknown column '{}' for table '{}'",
                column,
                E::TABLE
            )))
        }
    }

    fn check_filters(filters: &[Filter]) -> Result<()> {
        for filter in filters {
            Self::check_column(filter.column())?;
        }
        Ok(())
    }

    /// Fetch entities with optional filtering, ordering and pagination.
    ///
    /// Default order is insertion order; `descending` reverses the stated
    /// `order_by`. Absent `limit` returns all matches.
    pub async fn get_many(&self, filters: &[Filter], opts: &QueryOptions<'_>) -> Result<Vec<E>> {
        Self::check_filters(filters)?;
        if let Some(order_by) = opts.order_by {
            Self::check_column(order_by)?;
        }

        let (where_sql, binds) = where_clause(filters);
        let mut sql = format!("SELECT {t}.* FROM {t}", t = E::TABLE);
        if let Some(join) = opts.join {
            sql.push_str(&format!(" JOIN {join}"));
        }
        sql.push_str(&where_sql);
        if let Some(order_by) = opts.order_by {
            sql.push_str(&format!(" ORDER BY {order_by}"));
            if opts.descending {
                sql.push_str(" DESC");
            }
        }
        if let Some(limit) = opts.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = opts.offset {
            // SQLite requires a LIMIT before OFFSET
            if opts.limit.is_none() {
                sql.push_str(" LIMIT -1");
            }
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let query = bind_values!(sqlx::query_as::<_, E>(&sql), binds);
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Fetch every row in the table, in insertion order.
    pub async fn get_all(&self) -> Result<Vec<E>> {
        self.get_many(&[], &QueryOptions::default()).await
    }

    /// Single-column integer projection: `SELECT column FROM table WHERE ..`.
    pub async fn pluck_i64(&self, column: &str, filters: &[Filter]) -> Result<Vec<i64>> {
        Self::check_column(column)?;
        Self::check_filters(filters)?;

        let (where_sql, binds) = where_clause(filters);
        let sql = format!("SELECT {column} FROM {}{where_sql}", E::TABLE);
        let query = bind_values!(sqlx::query_scalar::<_, i64>(&sql), binds);
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Lazy batched traversal ordered by primary key ascending.
    ///
    /// Each batch holds at most `chunk_size` rows; iteration ends on the
    /// first empty batch. Restartable from `offset`. Only one batch is in
    /// memory at a time.
    pub fn chunks(
        &self,
        filters: Vec<Filter>,
        chunk_size: usize,
        offset: i64,
    ) -> ChunkIterator<'_, E> {
        ChunkIterator {
            repo: self,
            filters,
            chunk_size,
            offset,
        }
    }

    /// Lazy per-item traversal backed by batched fetches of `chunk_size`.
    pub fn stream(
        &self,
        filters: Vec<Filter>,
        chunk_size: usize,
    ) -> impl Stream<Item = Result<E>> + '_ {
        let chunks = self.chunks(filters, chunk_size, 0);
        futures::stream::try_unfold(
            (chunks, VecDeque::new(), false),
            |(mut chunks, mut buffer, mut exhausted)| async move {
                if buffer.is_empty() && !exhausted {
                    match chunks.next_chunk().await? {
                        Some(batch) => buffer.extend(batch),
                        None => exhausted = true,
                    }
                }
                Ok(buffer
                    .pop_front()
                    .map(|item| (item, (chunks, buffer, exhausted))))
            },
        )
    }

    /// Fetch one matching entity, or `None` when nothing matches.
    pub async fn get_one(
        &self,
        filters: &[Filter],
        offset: i64,
        order_by: Option<&str>,
    ) -> Result<Option<E>> {
        let opts = QueryOptions {
            limit: Some(1),
            offset: Some(offset),
            order_by: Some(order_by.unwrap_or(E::PRIMARY_KEY)),
            ..QueryOptions::default()
        };
        Ok(self.get_many(filters, &opts).await?.into_iter().next())
    }

    /// Fetch by primary key. A missing row is a caller logic error and
    /// fails with `NotFound`, unlike `get_one`.
    pub async fn get_by_id(&self, id: i64) -> Result<E> {
        self.get_one(&[Filter::Eq(E::PRIMARY_KEY, Value::Int(id))], 0, None)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("{} with {} = {}", E::TABLE, E::PRIMARY_KEY, id))
            })
    }

    /// Fetch the most recently inserted entity (max primary key).
    pub async fn get_last(&self) -> Result<E> {
        let opts = QueryOptions {
            limit: Some(1),
            order_by: Some(E::PRIMARY_KEY),
            descending: true,
            ..QueryOptions::default()
        };
        self.get_many(&[], &opts)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("{} is empty", E::TABLE)))
    }

    /// Count rows matching the filters.
    pub async fn count(&self, filters: &[Filter], join: Option<&str>) -> Result<i64> {
        Self::check_filters(filters)?;

        let (where_sql, binds) = where_clause(filters);
        let mut sql = format!(
            "SELECT COUNT({t}.{pk}) FROM {t}",
            t = E::TABLE,
            pk = E::PRIMARY_KEY
        );
        if let Some(join) = join {
            sql.push_str(&format!(" JOIN {join}"));
        }
        sql.push_str(&where_sql);

        let query = bind_values!(sqlx::query_scalar::<_, i64>(&sql), binds);
        Ok(query.fetch_one(&self.pool).await?)
    }

    /// Sum an integer column over matching rows; zero when nothing matches.
    pub async fn sum(&self, column: &str, filters: &[Filter]) -> Result<i64> {
        Self::check_column(column)?;
        Self::check_filters(filters)?;

        let (where_sql, binds) = where_clause(filters);
        let sql = format!("SELECT COALESCE(SUM({column}), 0) FROM {}{where_sql}", E::TABLE);
        let query = bind_values!(sqlx::query_scalar::<_, i64>(&sql), binds);
        Ok(query.fetch_one(&self.pool).await?)
    }

    /// Delete matching rows and return how many were removed.
    ///
    /// Requires at least one filter; a full-table delete must go through
    /// the explicit [`Repository::delete_all`].
    pub async fn delete(&self, filters: &[Filter]) -> Result<u64> {
        if filters.is_empty() {
            return Err(AppError::invalid_argument(
                "delete requires at least one filter; use delete_all for a full wipe",
            ));
        }
        Self::check_filters(filters)?;

        let (where_sql, binds) = where_clause(filters);
        let sql = format!("DELETE FROM {}{where_sql}", E::TABLE);
        let query = bind_values!(sqlx::query(&sql), binds);
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    /// Delete every row in the table.
    pub async fn delete_all(&self) -> Result<u64> {
        let sql = format!("DELETE FROM {}", E::TABLE);
        Ok(sqlx::query(&sql).execute(&self.pool).await?.rows_affected())
    }

    /// Update matching rows with the given column/value pairs.
    pub async fn update_many(&self, filters: &[Filter], values: &[(&str, Value)]) -> Result<u64> {
        if filters.is_empty() || values.is_empty() {
            return Err(AppError::invalid_argument(
                "update_many requires at least one filter and one value",
            ));
        }
        Self::check_filters(filters)?;
        for (column, _) in values {
            Self::check_column(column)?;
        }

        let assignments = values
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let (where_sql, filter_binds) = where_clause(filters);
        let sql = format!("UPDATE {} SET {assignments}{where_sql}", E::TABLE);

        let value_binds: Vec<&Value> = values.iter().map(|(_, v)| v).collect();
        let query = bind_values!(sqlx::query(&sql), value_binds);
        let query = bind_values!(query, filter_binds);
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    /// Update matching rows, or insert a new row from `values` when nothing
    /// matched. Update-first keeps re-runs idempotent.
    ///
    /// Not safe under concurrent callers racing on the same filters: this
    /// is a read-then-write with no atomic compare-and-swap. Concurrent use
    /// needs a UNIQUE constraint and conflict handling at the schema level.
    pub async fn upsert(&self, filters: &[Filter], values: &[(&str, Value)]) -> Result<Upsert<E>> {
        let updated = self.update_many(filters, values).await?;
        if updated > 0 {
            return Ok(Upsert::Updated(updated));
        }

        let columns = values
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(", ");
        let marks = vec!["?"; values.len()].join(", ");
        let sql = format!("INSERT INTO {} ({columns}) VALUES ({marks})", E::TABLE);

        let value_binds: Vec<&Value> = values.iter().map(|(_, v)| v).collect();
        let query = bind_values!(sqlx::query(&sql), value_binds);
        let id = query.execute(&self.pool).await?.last_insert_rowid();
        Ok(Upsert::Created(self.get_by_id(id).await?))
    }
}

/// Batched cursor produced by [`Repository::chunks`].
pub struct ChunkIterator<'r, E: Entity> {
    repo: &'r Repository<E>,
    filters: Vec<Filter>,
    chunk_size: usize,
    offset: i64,
}

impl<E: Entity> ChunkIterator<'_, E> {
    /// Fetch the next batch, or `None` once the result set is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<E>>> {
        let opts = QueryOptions {
            limit: Some(self.chunk_size as i64),
            offset: Some(self.offset),
            order_by: Some(E::PRIMARY_KEY),
            ..QueryOptions::default()
        };
        let batch = self.repo.get_many(&self.filters, &opts).await?;
        if batch.is_empty() {
            return Ok(None);
        }
        self.offset += batch.len() as i64;
        Ok(Some(batch))
    }
}
