//! The fixed `sales` sample dataset

use crate::backend::{EngineConnection, EngineHandle};
use crate::error::EngineFault;
use crate::normalize::Normalizer;
use log::{info, warn};

pub const CREATE_SALES_TABLE: &str = "CREATE TABLE IF NOT EXISTS sales (
    date DATE,
    region VARCHAR,
    product VARCHAR,
    amount DECIMAL(10, 2)
)";

pub const COUNT_SALES: &str = "SELECT COUNT(*) AS count FROM sales";

/// One literal row of the sample dataset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaleRecord {
    pub date: &'static str,
    pub region: &'static str,
    pub product: &'static str,
    pub amount: f64,
}

const fn sale(date: &'static str, region: &'static str, product: &'static str, amount: f64) -> SaleRecord {
    SaleRecord {
        date,
        region,
        product,
        amount,
    }
}

pub const SALES_ROWS: [SaleRecord; 20] = [
    sale("2023-01-01", "Tokyo", "ProductA", 1200.50),
    sale("2023-01-01", "Osaka", "ProductB", 950.75),
    sale("2023-01-02", "Tokyo", "ProductA", 1100.25),
    sale("2023-01-02", "Tokyo", "ProductB", 800.00),
    sale("2023-01-03", "Osaka", "ProductA", 1300.00),
    sale("2023-01-03", "Tokyo", "ProductB", 950.50),
    sale("2023-01-04", "Osaka", "ProductA", 1250.75),
    sale("2023-01-04", "Tokyo", "ProductB", 900.25),
    sale("2023-01-05", "Tokyo", "ProductA", 1400.00),
    sale("2023-01-05", "Osaka", "ProductB", 875.50),
    sale("2023-01-06", "Tokyo", "ProductA", 1150.25),
    sale("2023-01-06", "Osaka", "ProductB", 925.75),
    sale("2023-01-07", "Tokyo", "ProductA", 1300.50),
    sale("2023-01-07", "Tokyo", "ProductB", 850.00),
    sale("2023-01-08", "Osaka", "ProductA", 1200.00),
    sale("2023-01-08", "Tokyo", "ProductB", 900.50),
    sale("2023-01-09", "Osaka", "ProductA", 1350.75),
    sale("2023-01-09", "Tokyo", "ProductB", 950.25),
    sale("2023-01-10", "Tokyo", "ProductA", 1450.00),
    sale("2023-01-10", "Osaka", "ProductB", 975.50),
];

/// `INSERT` statement for every sample row
pub fn insert_statement() -> String {
    let values = SALES_ROWS
        .iter()
        .map(|r| {
            format!(
                "('{}', '{}', '{}', {:.2})",
                r.date, r.region, r.product, r.amount
            )
        })
        .collect::<Vec<_>>()
        .join(",\n    ");
    format!("INSERT INTO sales VALUES\n    {}", values)
}

/// What seeding did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Table was empty (or its size unknown); rows were inserted
    Inserted(usize),
    /// Table already had rows; nothing was written
    AlreadyPresent(u64),
}

/// Create the table if absent and insert the sample rows if it is empty
pub async fn seed_sample_data<C: EngineConnection>(
    conn: &mut C,
    normalizer: &Normalizer,
) -> Result<SeedOutcome, EngineFault> {
    conn.query(CREATE_SALES_TABLE).await?;

    match existing_rows(conn, normalizer).await {
        Ok(count) if count > 0 => {
            info!("sample data already present ({} rows)", count);
            return Ok(SeedOutcome::AlreadyPresent(count));
        }
        Ok(_) => {}
        Err(fault) => warn!("sales row count check failed, inserting anyway: {}", fault),
    }

    conn.query(&insert_statement()).await?;
    info!("seeded {} sample sales rows", SALES_ROWS.len());
    Ok(SeedOutcome::Inserted(SALES_ROWS.len()))
}

async fn existing_rows<C: EngineConnection>(
    conn: &mut C,
    normalizer: &Normalizer,
) -> Result<u64, EngineFault> {
    let rows = normalizer.normalize(conn.query(COUNT_SALES).await?);
    rows.first()
        .and_then(|row| row.get("count"))
        .and_then(|count| count.as_f64())
        .map(|count| count as u64)
        .ok_or_else(|| EngineFault::new("row count missing from result"))
}

/// Seed through a dedicated connection that is closed on every path
pub async fn seed_handle<H: EngineHandle>(
    handle: &H,
    normalizer: &Normalizer,
) -> Result<SeedOutcome, EngineFault> {
    let mut conn = handle.connect().await?;
    let outcome = seed_sample_data(&mut conn, normalizer).await;
    if let Err(fault) = conn.close().await {
        warn!("failed to close seeding connection: {}", fault);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_statement_reproduces_literal_rows() {
        let sql = insert_statement();
        assert!(sql.starts_with("INSERT INTO sales VALUES"));
        assert!(sql.contains("('2023-01-01', 'Tokyo', 'ProductA', 1200.50)"));
        assert!(sql.contains("('2023-01-01', 'Osaka', 'ProductB', 950.75)"));
        assert!(sql.contains("('2023-01-10', 'Osaka', 'ProductB', 975.50)"));
        assert_eq!(sql.matches("('2023-").count(), 20);
    }

    #[test]
    fn literal_totals() {
        let total = |region: &str| -> f64 {
            SALES_ROWS
                .iter()
                .filter(|r| r.region == region)
                .map(|r| r.amount)
                .sum()
        };
        assert_eq!(total("Tokyo"), 12953.0);
        assert_eq!(total("Osaka"), 8829.0);
    }
}
