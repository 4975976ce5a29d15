//! The three fixed dashboard queries and their chart-safe series

use crate::backend::{AssetProbe, EngineLoader};
use crate::error::Result;
use crate::service::DashboardEngine;
use dashboard_types::{
    DailySales, DashboardData, NormalizedRow, ProductTotal, RegionTotal, Scalar,
};

pub const SALES_BY_REGION: &str = "SELECT region, CAST(SUM(amount) AS DOUBLE) AS total
FROM sales
GROUP BY region
ORDER BY total DESC";

pub const SALES_BY_PRODUCT: &str = "SELECT product, CAST(SUM(amount) AS DOUBLE) AS total
FROM sales
GROUP BY product
ORDER BY total DESC";

pub const DAILY_SALES: &str = "SELECT date, CAST(SUM(amount) AS DOUBLE) AS amount
FROM sales
GROUP BY date
ORDER BY date";

/// Run the dashboard queries in order and shape the results for charts
pub async fn load_dashboard<L, P>(engine: &DashboardEngine<L, P>) -> Result<DashboardData>
where
    L: EngineLoader + 'static,
    P: AssetProbe + 'static,
{
    let by_region = engine
        .run(SALES_BY_REGION)
        .await?
        .iter()
        .map(|row| RegionTotal {
            region: label(row, "region"),
            total: number(row, "total"),
        })
        .collect();

    let by_product = engine
        .run(SALES_BY_PRODUCT)
        .await?
        .iter()
        .map(|row| ProductTotal {
            product: label(row, "product"),
            total: number(row, "total"),
        })
        .collect();

    let daily_sales = engine
        .run(DAILY_SALES)
        .await?
        .iter()
        .map(|row| DailySales {
            date: label(row, "date"),
            amount: number(row, "amount"),
        })
        .collect();

    Ok(DashboardData {
        by_region,
        by_product,
        daily_sales,
    })
}

/// Category label; missing or null is the empty string
fn label(row: &NormalizedRow, column: &str) -> String {
    match row.get(column) {
        Some(value) if !value.is_null() => value.to_string(),
        _ => String::new(),
    }
}

/// Chart value; anything that is not a finite number is `0`
fn number(row: &NormalizedRow, column: &str) -> f64 {
    let value = match row.get(column) {
        Some(Scalar::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => other.as_f64(),
        None => None,
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn row(cells: &[(&str, Scalar)]) -> NormalizedRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn labels_default_to_empty() {
        let r = row(&[("region", Scalar::Null), ("product", Scalar::Int(7))]);
        assert_eq!(label(&r, "region"), "");
        assert_eq!(label(&r, "missing"), "");
        assert_eq!(label(&r, "product"), "7");
    }

    #[test]
    fn numbers_are_always_chart_safe() {
        let r = row(&[
            ("a", Scalar::Float(1.5)),
            ("b", Scalar::from("2.25")),
            ("c", Scalar::from("oops")),
            ("d", Scalar::Bool(true)),
            ("e", Scalar::Int(3)),
        ]);
        assert_eq!(number(&r, "a"), 1.5);
        assert_eq!(number(&r, "b"), 2.25);
        assert_eq!(number(&r, "c"), 0.0);
        assert_eq!(number(&r, "d"), 0.0);
        assert_eq!(number(&r, "e"), 3.0);
        assert_eq!(number(&r, "missing"), 0.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn dashboard_over_seeded_sales() {
        let (_assets, svc) = crate::testing::native_engine();
        block_on(svc.initialize()).unwrap();

        let data = block_on(load_dashboard(&svc)).unwrap();

        assert_eq!(
            data.by_region,
            vec![
                RegionTotal { region: "Tokyo".into(), total: 12953.0 },
                RegionTotal { region: "Osaka".into(), total: 8829.0 },
            ]
        );
        assert_eq!(
            data.by_product,
            vec![
                ProductTotal { product: "ProductA".into(), total: 12703.0 },
                ProductTotal { product: "ProductB".into(), total: 9079.0 },
            ]
        );

        assert_eq!(data.daily_sales.len(), 10);
        assert_eq!(
            data.daily_sales[0],
            DailySales { date: "2023-01-01".into(), amount: 2151.25 }
        );
        assert_eq!(data.daily_sales[9].date, "2023-01-10");
        let dates: Vec<_> = data.daily_sales.iter().map(|d| d.date.clone()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn dashboard_requires_initialized_engine() {
        use crate::error::EngineError;
        use crate::testing::{FakeLoader, FakeProbe};
        use dashboard_types::DashboardConfig;

        let svc = DashboardEngine::new(
            &DashboardConfig::default(),
            FakeLoader::default(),
            FakeProbe::default(),
        );
        assert_eq!(
            block_on(load_dashboard(&svc)).unwrap_err(),
            EngineError::NotInitialized
        );
    }
}
