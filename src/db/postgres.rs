//! PostgreSQL query executor
//!
//! Concrete [`QueryExecutor`] using tokio-postgres. TLS is negotiated with
//! rustls unless the connection string says `sslmode=disable`.

use crate::db::executor::QueryExecutor;
use crate::db::types::{CellValue, ColumnDef, DataType, QueryResults, Row};
use crate::error::{DbError, DbResult};
use rust_decimal::Decimal;
use std::time::Instant;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::{Client, Config};

/// PostgreSQL executor holding one open client
pub struct PostgresExecutor {
    client: Client,
}

impl PostgresExecutor {
    /// Connect using a libpq-style or `postgres://` URL connection string.
    ///
    /// The connection task is spawned on the runtime; if it dies the error is
    /// logged and the next query fails with `QueryFailed`.
    pub async fn connect(conn_string: &str) -> DbResult<Self> {
        let config: Config = conn_string
            .parse()
            .map_err(|e: tokio_postgres::Error| DbError::InvalidConnectionString(e.to_string()))?;

        let client = match config.get_ssl_mode() {
            SslMode::Disable => {
                let (client, connection) = config
                    .connect(tokio_postgres::NoTls)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        log::error!("postgres connection lost: {}", e);
                    }
                });
                client
            }
            _ => {
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(make_tls_config());
                let (client, connection) = config
                    .connect(tls)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        log::error!("postgres connection lost: {}", e);
                    }
                });
                client
            }
        };

        log::debug!("connected to postgres");
        Ok(Self { client })
    }

    /// Lightweight liveness check used by `pam init`
    pub async fn ping(&self) -> DbResult<()> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))
    }
}

impl QueryExecutor for PostgresExecutor {
    async fn execute(&self, sql: &str) -> DbResult<QueryResults> {
        let start = Instant::now();

        let stmt = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        let columns: Vec<ColumnDef> = stmt
            .columns()
            .iter()
            .map(|col| ColumnDef::new(col.name(), pg_type_to_datatype(col.type_())))
            .collect();

        let pg_rows = self
            .client
            .query(&stmt, &[])
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        let rows = pg_rows
            .iter()
            .map(|pg_row| Row {
                values: columns
                    .iter()
                    .enumerate()
                    .map(|(i, col)| extract_cell_value(pg_row, i, &col.data_type))
                    .collect(),
            })
            .collect::<Vec<_>>();

        log::debug!("query returned {} rows x {} cols", rows.len(), columns.len());
        Ok(QueryResults::new(columns, rows, start.elapsed()))
    }
}

fn pg_type_to_datatype(pg_type: &Type) -> DataType {
    match *pg_type {
        Type::INT2 => DataType::SmallInt,
        Type::INT4 => DataType::Integer,
        Type::INT8 => DataType::BigInt,
        Type::FLOAT4 => DataType::Real,
        Type::FLOAT8 => DataType::Double,
        Type::NUMERIC => DataType::Numeric,
        Type::TEXT | Type::NAME => DataType::Text,
        Type::VARCHAR => DataType::Varchar,
        Type::CHAR | Type::BPCHAR => DataType::Char,
        Type::BOOL => DataType::Boolean,
        Type::DATE => DataType::Date,
        Type::TIME => DataType::Time,
        Type::TIMESTAMP => DataType::Timestamp,
        Type::TIMESTAMPTZ => DataType::TimestampTz,
        Type::INTERVAL => DataType::Interval,
        Type::JSON => DataType::Json,
        Type::JSONB => DataType::Jsonb,
        Type::BYTEA => DataType::Bytea,
        Type::UUID => DataType::Uuid,
        Type::BOOL_ARRAY => DataType::Array(Box::new(DataType::Boolean)),
        Type::INT2_ARRAY => DataType::Array(Box::new(DataType::SmallInt)),
        Type::INT4_ARRAY => DataType::Array(Box::new(DataType::Integer)),
        Type::INT8_ARRAY => DataType::Array(Box::new(DataType::BigInt)),
        Type::FLOAT4_ARRAY => DataType::Array(Box::new(DataType::Real)),
        Type::FLOAT8_ARRAY => DataType::Array(Box::new(DataType::Double)),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY | Type::NAME_ARRAY => {
            DataType::Array(Box::new(DataType::Text))
        }
        Type::UUID_ARRAY => DataType::Array(Box::new(DataType::Uuid)),
        Type::JSONB_ARRAY => DataType::Array(Box::new(DataType::Jsonb)),
        Type::JSON_ARRAY => DataType::Array(Box::new(DataType::Json)),
        Type::NUMERIC_ARRAY => DataType::Array(Box::new(DataType::Numeric)),
        _ => DataType::Unknown(pg_type.name().to_string()),
    }
}

fn make_tls_config() -> rustls::ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();

    let native_certs = rustls_native_certs::load_native_certs();
    let loaded = native_certs
        .certs
        .into_iter()
        .filter(|cert| root_store.add(cert.clone()).is_ok())
        .count();
    if loaded == 0 {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

/// Decode column `idx` as `T`, mapping SQL NULL to [`CellValue::Null`]
fn typed<T>(row: &tokio_postgres::Row, idx: usize, wrap: impl FnOnce(T) -> CellValue) -> CellValue
where
    T: for<'a> FromSql<'a>,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(v)) => wrap(v),
        Ok(None) => CellValue::Null,
        Err(_) => fallback_text(row, idx),
    }
}

fn typed_array<T>(row: &tokio_postgres::Row, idx: usize, wrap: impl Fn(T) -> CellValue) -> CellValue
where
    T: for<'a> FromSql<'a>,
{
    typed::<Vec<T>>(row, idx, |items| {
        CellValue::Array(items.into_iter().map(wrap).collect())
    })
}

fn extract_cell_value(row: &tokio_postgres::Row, idx: usize, data_type: &DataType) -> CellValue {
    match data_type {
        DataType::SmallInt => typed::<i16>(row, idx, |v| CellValue::Integer(v.into())),
        DataType::Integer => typed::<i32>(row, idx, |v| CellValue::Integer(v.into())),
        DataType::BigInt => typed::<i64>(row, idx, CellValue::Integer),
        DataType::Real => typed::<f32>(row, idx, |v| CellValue::Float(v.into())),
        DataType::Double => typed::<f64>(row, idx, CellValue::Float),
        DataType::Numeric => typed::<Decimal>(row, idx, |v| CellValue::Text(v.to_string())),
        DataType::Boolean => typed::<bool>(row, idx, CellValue::Boolean),
        DataType::Json | DataType::Jsonb => typed::<serde_json::Value>(row, idx, CellValue::Json),
        DataType::Bytea => typed::<Vec<u8>>(row, idx, CellValue::Binary),
        DataType::Uuid => typed::<uuid::Uuid>(row, idx, |v| CellValue::Uuid(v.to_string())),
        DataType::Timestamp => typed::<chrono::NaiveDateTime>(row, idx, |v| {
            CellValue::DateTime(v.to_string())
        }),
        DataType::TimestampTz => typed::<chrono::DateTime<chrono::Utc>>(row, idx, |v| {
            CellValue::DateTime(v.to_string())
        }),
        DataType::Date => typed::<chrono::NaiveDate>(row, idx, |v| CellValue::DateTime(v.to_string())),
        DataType::Time => typed::<chrono::NaiveTime>(row, idx, |v| CellValue::DateTime(v.to_string())),
        DataType::Array(inner) => extract_array_value(row, idx, inner),
        // Text types, intervals and anything unknown
        _ => fallback_text(row, idx),
    }
}

fn extract_array_value(row: &tokio_postgres::Row, idx: usize, inner: &DataType) -> CellValue {
    match inner {
        DataType::Text | DataType::Varchar | DataType::Char => {
            typed_array::<String>(row, idx, CellValue::Text)
        }
        DataType::SmallInt => typed_array::<i16>(row, idx, |v| CellValue::Integer(v.into())),
        DataType::Integer => typed_array::<i32>(row, idx, |v| CellValue::Integer(v.into())),
        DataType::BigInt => typed_array::<i64>(row, idx, CellValue::Integer),
        DataType::Real => typed_array::<f32>(row, idx, |v| CellValue::Float(v.into())),
        DataType::Double => typed_array::<f64>(row, idx, CellValue::Float),
        DataType::Boolean => typed_array::<bool>(row, idx, CellValue::Boolean),
        DataType::Uuid => typed_array::<uuid::Uuid>(row, idx, |v| CellValue::Uuid(v.to_string())),
        DataType::Json | DataType::Jsonb => {
            typed_array::<serde_json::Value>(row, idx, CellValue::Json)
        }
        DataType::Numeric => typed_array::<Decimal>(row, idx, |v| CellValue::Text(v.to_string())),
        _ => fallback_text(row, idx),
    }
}

fn fallback_text(row: &tokio_postgres::Row, idx: usize) -> CellValue {
    match row.try_get::<_, Option<String>>(idx) {
        Ok(Some(v)) => CellValue::Text(v),
        Ok(None) => CellValue::Null,
        Err(_) => {
            let type_name = row
                .columns()
                .get(idx)
                .map_or("unknown", |c| c.type_().name());
            CellValue::Text(format!("<unable to display: {}>", type_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pg_type_mapping() {
        assert_eq!(pg_type_to_datatype(&Type::INT4), DataType::Integer);
        assert_eq!(pg_type_to_datatype(&Type::VARCHAR), DataType::Varchar);
        assert_eq!(
            pg_type_to_datatype(&Type::TEXT_ARRAY),
            DataType::Array(Box::new(DataType::Text))
        );
        assert_eq!(
            pg_type_to_datatype(&Type::INET),
            DataType::Unknown("inet".to_string())
        );
    }

    #[test]
    fn test_connect_rejects_malformed_connection_string() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(PostgresExecutor::connect("port=notanumber"));
        assert!(matches!(result, Err(DbError::InvalidConnectionString(_))));
    }
}
