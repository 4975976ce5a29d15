//! Native DuckDB backend
//!
//! Runs the same service against an in-memory DuckDB database outside the
//! browser. Bundle variants only select which assets were probed; every
//! variant opens the same native engine. Dates are delivered as epoch
//! milliseconds, the way the browser engine delivers them.

use crate::backend::{EngineConnection, EngineHandle, EngineLoader};
use crate::error::EngineFault;
use crate::raw::{ColumnTable, RawResult, RawValue};
use async_trait::async_trait;
use dashboard_types::BundleVariant;
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use log::info;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Opens in-memory DuckDB databases
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeLoader;

#[async_trait(?Send)]
impl EngineLoader for NativeLoader {
    type Handle = NativeHandle;

    async fn instantiate(&self, variant: &BundleVariant) -> Result<NativeHandle, EngineFault> {
        let conn = Connection::open_in_memory()
            .map_err(|e| EngineFault::new(format!("failed to open DuckDB: {}", e)))?;
        info!("opened in-memory DuckDB ({} bundle)", variant.tier);
        Ok(NativeHandle { conn })
    }
}

/// One in-memory database
pub struct NativeHandle {
    conn: Connection,
}

#[async_trait(?Send)]
impl EngineHandle for NativeHandle {
    type Connection = NativeConnection;

    async fn connect(&self) -> Result<NativeConnection, EngineFault> {
        let conn = self
            .conn
            .try_clone()
            .map_err(|e| EngineFault::new(format!("failed to open connection: {}", e)))?;
        Ok(NativeConnection { conn })
    }
}

/// Connection to a [`NativeHandle`]'s database
pub struct NativeConnection {
    conn: Connection,
}

#[async_trait(?Send)]
impl EngineConnection for NativeConnection {
    async fn query(&mut self, sql: &str) -> Result<RawResult, EngineFault> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| EngineFault::new(e.to_string()))?;

        let mut rows = stmt
            .query([])
            .map_err(|e| EngineFault::new(format!("failed to execute query: {}", e)))?;

        let mut columns: Vec<Vec<RawValue>> = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| EngineFault::new(format!("failed to fetch row: {}", e)))?
        {
            for i in 0.. {
                match row.get_ref(i) {
                    Ok(value) => {
                        if columns.len() <= i {
                            columns.push(Vec::new());
                        }
                        columns[i].push(to_raw(value));
                    }
                    Err(_) => break,
                }
            }
        }

        // Column names are only available once the rows borrow is released
        drop(rows);
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        columns.resize(names.len(), Vec::new());

        Ok(RawResult::Columnar(Box::new(ColumnTable { names, columns })))
    }

    async fn close(self) -> Result<(), EngineFault> {
        drop(self.conn);
        Ok(())
    }
}

fn to_raw(value: ValueRef<'_>) -> RawValue {
    match value {
        ValueRef::Null => RawValue::Null,
        ValueRef::Boolean(b) => RawValue::Bool(b),
        ValueRef::TinyInt(i) => RawValue::Int(i.into()),
        ValueRef::SmallInt(i) => RawValue::Int(i.into()),
        ValueRef::Int(i) => RawValue::Int(i.into()),
        ValueRef::BigInt(i) => RawValue::Int(i),
        ValueRef::HugeInt(i) => match i64::try_from(i) {
            Ok(n) => RawValue::Int(n),
            Err(_) => RawValue::Text(i.to_string()),
        },
        ValueRef::UTinyInt(i) => RawValue::Int(i.into()),
        ValueRef::USmallInt(i) => RawValue::Int(i.into()),
        ValueRef::UInt(i) => RawValue::Int(i.into()),
        ValueRef::UBigInt(i) => match i64::try_from(i) {
            Ok(n) => RawValue::Int(n),
            Err(_) => RawValue::Float(i as f64),
        },
        ValueRef::Float(f) => RawValue::Float(f as f64),
        ValueRef::Double(f) => RawValue::Float(f),
        // Exact decimals travel as text, like the browser engine's
        ValueRef::Decimal(d) => RawValue::Text(d.to_string()),
        ValueRef::Text(s) => RawValue::Text(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Date32(days) => RawValue::Int(i64::from(days) * MILLIS_PER_DAY),
        ValueRef::Timestamp(unit, v) => RawValue::Int(match unit {
            TimeUnit::Second => v.saturating_mul(1000),
            TimeUnit::Millisecond => v,
            TimeUnit::Microsecond => v / 1000,
            TimeUnit::Nanosecond => v / 1_000_000,
        }),
        ValueRef::Blob(b) => RawValue::Text(format!("<{} bytes>", b.len())),
        other => RawValue::Text(format!("{:?}", other)),
    }
}
