//! Dashboard series and the chart configurations built from them

use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// Pie slice colors, cycled per category
pub const PALETTE: [&str; 4] = ["#0088FE", "#00C49F", "#FFBB28", "#FF8042"];

/// Bar fill for the daily series
pub const BAR_COLOR: &str = "#3498db";

/// Sales total for one region
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct RegionTotal {
    pub region: String,
    pub total: f64,
}

/// Sales total for one product
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ProductTotal {
    pub product: String,
    pub total: f64,
}

/// Sales amount for one day
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct DailySales {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    pub amount: f64,
}

/// Everything the dashboard page renders
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct DashboardData {
    /// Descending by total
    pub by_region: Vec<RegionTotal>,
    /// Descending by total
    pub by_product: Vec<ProductTotal>,
    /// Ascending by date
    pub daily_sales: Vec<DailySales>,
}

/// Chart type enumeration
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum ChartType {
    Bar,
    Pie,
}

/// Chart configuration
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ChartConfig {
    /// Unique chart ID
    pub id: String,
    /// Chart type
    pub chart_type: ChartType,
    /// Chart title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Data configuration
    pub data: ChartData,
}

/// Labels and datasets of one chart
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ChartData {
    /// Labels for X axis or categories
    pub labels: Vec<String>,
    /// Data series
    pub datasets: Vec<Dataset>,
}

/// A single data series
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Dataset {
    /// Series label
    pub label: String,
    /// Data values
    pub data: Vec<f64>,
    /// Background color (single or one per value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorValue>,
}

/// Color value (single or array for per-slice colors)
#[derive(Tsify, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(untagged)]
pub enum ColorValue {
    Single(String),
    Multiple(Vec<String>),
}

fn palette_for(len: usize) -> ColorValue {
    ColorValue::Multiple(
        (0..len)
            .map(|i| PALETTE[i % PALETTE.len()].to_string())
            .collect(),
    )
}

fn pie(id: &str, title: &str, labels: Vec<String>, values: Vec<f64>) -> ChartConfig {
    let colors = palette_for(values.len());
    ChartConfig {
        id: id.to_string(),
        chart_type: ChartType::Pie,
        title: Some(title.to_string()),
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: "Sales".to_string(),
                data: values,
                background_color: Some(colors),
            }],
        },
    }
}

impl DashboardData {
    /// Daily bar chart followed by the region and product pies
    pub fn charts(&self) -> Vec<ChartConfig> {
        let daily = ChartConfig {
            id: "daily-sales".to_string(),
            chart_type: ChartType::Bar,
            title: Some("Daily sales".to_string()),
            data: ChartData {
                labels: self.daily_sales.iter().map(|d| d.date.clone()).collect(),
                datasets: vec![Dataset {
                    label: "Sales".to_string(),
                    data: self.daily_sales.iter().map(|d| d.amount).collect(),
                    background_color: Some(ColorValue::Single(BAR_COLOR.to_string())),
                }],
            },
        };

        let by_region = pie(
            "sales-by-region",
            "Sales by region",
            self.by_region.iter().map(|r| r.region.clone()).collect(),
            self.by_region.iter().map(|r| r.total).collect(),
        );

        let by_product = pie(
            "sales-by-product",
            "Sales by product",
            self.by_product.iter().map(|p| p.product.clone()).collect(),
            self.by_product.iter().map(|p| p.total).collect(),
        );

        vec![daily, by_region, by_product]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DashboardData {
        DashboardData {
            by_region: vec![
                RegionTotal { region: "Tokyo".into(), total: 12953.0 },
                RegionTotal { region: "Osaka".into(), total: 8829.0 },
            ],
            by_product: vec![
                ProductTotal { product: "ProductA".into(), total: 12703.0 },
                ProductTotal { product: "ProductB".into(), total: 9079.0 },
            ],
            daily_sales: vec![
                DailySales { date: "2023-01-01".into(), amount: 2151.25 },
                DailySales { date: "2023-01-02".into(), amount: 1900.25 },
            ],
        }
    }

    #[test]
    fn charts_follow_dashboard_series() {
        let charts = sample().charts();
        assert_eq!(charts.len(), 3);

        assert_eq!(charts[0].chart_type, ChartType::Bar);
        assert_eq!(charts[0].data.labels, vec!["2023-01-01", "2023-01-02"]);
        assert_eq!(charts[0].data.datasets[0].data, vec![2151.25, 1900.25]);

        assert_eq!(charts[1].chart_type, ChartType::Pie);
        assert_eq!(charts[1].data.labels, vec!["Tokyo", "Osaka"]);
        assert_eq!(charts[2].data.datasets[0].data, vec![12703.0, 9079.0]);
    }

    #[test]
    fn pie_colors_cycle_through_palette() {
        let colors = palette_for(6);
        match colors {
            ColorValue::Multiple(c) => {
                assert_eq!(c.len(), 6);
                assert_eq!(c[4], PALETTE[0]);
            }
            ColorValue::Single(_) => panic!("expected per-slice colors"),
        }
    }

    #[test]
    fn empty_dashboard_yields_empty_charts() {
        let charts = DashboardData::default().charts();
        assert!(charts.iter().all(|c| c.data.labels.is_empty()));
    }
}
