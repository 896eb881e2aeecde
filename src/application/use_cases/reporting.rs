// ============================================================
// AGGREGATION & REPORTING
// ============================================================
// Group-and-sum by dimension, bar charts, executive summary

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::domain::error::AppError;
use crate::domain::table::{CanonicalColumn, Dataset, Value};
use crate::infrastructure::chart::{write_svg, BarChart};
use crate::infrastructure::storage::ensure_dir;

/// Dimensions the report groups by, in chart order.
const GROUP_DIMENSIONS: [CanonicalColumn; 2] = [CanonicalColumn::Company, CanonicalColumn::Country];

/// Metrics charted per dimension and totalled by the summary.
const HEADLINE_METRICS: [CanonicalColumn; 2] =
    [CanonicalColumn::GrossRevenue, CanonicalColumn::NetProfit];

const SUMMARY_LABEL_WIDTH: usize = 30;
const RULE: &str = "==================================================";

/// Per-group sums of the measures present in a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub dimension: CanonicalColumn,
    /// Header of the dimension column as found in the dataset
    pub dimension_header: String,
    /// Measures present, with their headers
    pub measures: Vec<(CanonicalColumn, String)>,
    /// Group key and one sum per entry of `measures`, in first-seen order
    pub groups: Vec<(String, Vec<f64>)>,
}

impl AggregateReport {
    /// Group `dataset` by `dimension`. `None` when the dimension is absent.
    pub fn build(dataset: &Dataset, dimension: CanonicalColumn) -> Option<Self> {
        let key_index = dimension.find_in(dataset)?;
        let measures: Vec<(CanonicalColumn, usize)> = CanonicalColumn::MEASURES
            .into_iter()
            .filter_map(|measure| measure.find_in(dataset).map(|index| (measure, index)))
            .collect();

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

        for row in dataset.rows() {
            let key = row[key_index].render();
            let position = *positions.entry(key.clone()).or_insert_with(|| {
                groups.push((key, vec![0.0; measures.len()]));
                groups.len() - 1
            });
            for (slot, (_, index)) in measures.iter().enumerate() {
                groups[position].1[slot] += row[*index].as_f64().unwrap_or(0.0);
            }
        }

        Some(Self {
            dimension,
            dimension_header: dataset.columns()[key_index].clone(),
            measures: measures
                .into_iter()
                .map(|(measure, index)| (measure, dataset.columns()[index].clone()))
                .collect(),
            groups,
        })
    }

    /// `(group, sum)` pairs for one measure, largest first. Ties keep
    /// first-seen order.
    pub fn sorted_series(&self, measure: CanonicalColumn) -> Option<Vec<(String, f64)>> {
        let slot = self.measures.iter().position(|(m, _)| *m == measure)?;
        let mut series: Vec<(String, f64)> = self
            .groups
            .iter()
            .map(|(key, sums)| (key.clone(), sums[slot]))
            .collect();
        series.sort_by(|a, b| b.1.total_cmp(&a.1));
        Some(series)
    }

    fn measure_header(&self, measure: CanonicalColumn) -> Option<&str> {
        self.measures
            .iter()
            .find(|(m, _)| *m == measure)
            .map(|(_, header)| header.as_str())
    }
}

/// What happened to one requested chart
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Written(PathBuf),
    Skipped { title: String, reason: String },
    /// The chart could not be written; the rest of the file's work goes on
    Failed { title: String, error: AppError },
}

/// Render every metric-by-dimension chart into `charts_dir`.
///
/// Missing columns and empty datasets produce `Skipped` entries and write
/// failures produce `Failed` entries; neither stops the remaining charts.
pub fn generate_charts(dataset: &Dataset, charts_dir: &Path) -> Vec<ChartOutcome> {
    let mut outcomes = Vec::new();

    for dimension in GROUP_DIMENSIONS {
        let report = AggregateReport::build(dataset, dimension);

        for metric in HEADLINE_METRICS {
            let title = format!("{} by {}", metric.name(), dimension.name());

            let skip_reason = if dataset.is_empty() {
                Some("dataset has no rows".to_string())
            } else if report.is_none() {
                Some(format!("column '{}' not present", dimension.name()))
            } else {
                None
            };
            let chart = report.as_ref().and_then(|report| {
                let bars = report.sorted_series(metric)?;
                Some(BarChart {
                    title: title.clone(),
                    x_label: report.dimension_header.clone(),
                    y_label: report.measure_header(metric)?.to_string(),
                    bars,
                })
            });

            match (skip_reason, chart) {
                (None, Some(chart)) => outcomes.push(save_chart(&chart, charts_dir)),
                (reason, _) => {
                    let reason =
                        reason.unwrap_or_else(|| format!("column '{}' not present", metric.name()));
                    warn!(chart = %title, reason = %reason, "Chart skipped");
                    outcomes.push(ChartOutcome::Skipped { title, reason });
                }
            }
        }
    }

    outcomes
}

fn save_chart(chart: &BarChart, charts_dir: &Path) -> ChartOutcome {
    let path = charts_dir.join(chart.file_name());
    let written = ensure_dir(charts_dir).and_then(|_| write_svg(chart, &path));

    match written {
        Ok(()) => {
            info!(chart = %chart.title, path = %path.display(), "Chart saved");
            ChartOutcome::Written(path)
        }
        Err(error) => {
            error!(chart = %chart.title, error = %error, "Chart failed");
            ChartOutcome::Failed {
                title: chart.title.clone(),
                error,
            }
        }
    }
}

/// Company count and headline totals of a cleaned dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutiveSummary {
    pub companies: usize,
    /// Header and total for each headline metric present
    pub totals: Vec<(String, f64)>,
}

impl ExecutiveSummary {
    /// `None` when there is nothing to summarize.
    pub fn build(dataset: Option<&Dataset>) -> Option<Self> {
        let dataset = dataset.filter(|dataset| !dataset.is_empty())?;

        let companies = CanonicalColumn::Company
            .find_in(dataset)
            .map(|index| {
                dataset
                    .column_values(index)
                    .filter(|value| !value.is_null())
                    .map(Value::identity)
                    .collect::<HashSet<_>>()
                    .len()
            })
            .unwrap_or(0);

        let totals = HEADLINE_METRICS
            .into_iter()
            .filter_map(|metric| metric.find_in(dataset))
            .map(|index| {
                let total = dataset
                    .column_values(index)
                    .filter_map(Value::as_f64)
                    .sum::<f64>();
                (dataset.columns()[index].clone(), total)
            })
            .collect();

        Some(Self { companies, totals })
    }

    pub fn render(&self, currency_symbol: &str) -> String {
        let mut text = format!(
            "{rule}\n{title:^50}\n{rule}\nConsolidated indicators for {count} company(ies):\n",
            rule = RULE,
            title = "EXECUTIVE SUMMARY",
            count = self.companies
        );
        for (label, total) in &self.totals {
            text.push_str(&format!(
                "  - {:<width$}: {}\n",
                label,
                format_currency(currency_symbol, *total),
                width = SUMMARY_LABEL_WIDTH
            ));
        }
        text.push_str(RULE);
        text
    }
}

/// `€ 1,234,567.89`; negatives as `€ -1,234.50`.
pub fn format_currency(symbol: &str, amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{} {}{}.{}", symbol, sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn cleaned() -> Dataset {
        let mut dataset =
            Dataset::with_header(["Company", "Country", "Year", "Gross Revenue", "Net Profit"]);
        let rows = [
            ("Acme Corp", "Brazil", 2020, 1000.0, 100.0),
            ("Beta", "Brazil", 2020, 3000.0, -50.0),
            ("Acme Corp", "Portugal", 2021, 2500.5, 200.0),
        ];
        for (company, country, year, revenue, profit) in rows {
            dataset
                .push_row(vec![
                    text(company),
                    text(country),
                    Value::Int(year),
                    Value::Real(revenue),
                    Value::Real(profit),
                ])
                .unwrap();
        }
        dataset
    }

    #[test]
    fn test_group_and_sum() {
        let report = AggregateReport::build(&cleaned(), CanonicalColumn::Company).unwrap();

        assert_eq!(report.dimension_header, "Company");
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0], ("Acme Corp".to_string(), vec![3500.5, 300.0]));
        assert_eq!(report.groups[1], ("Beta".to_string(), vec![3000.0, -50.0]));

        assert_eq!(
            report.sorted_series(CanonicalColumn::GrossRevenue).unwrap(),
            vec![("Acme Corp".to_string(), 3500.5), ("Beta".to_string(), 3000.0)]
        );
        assert!(report.sorted_series(CanonicalColumn::OperatingCost).is_none());
    }

    #[test]
    fn test_missing_dimension() {
        let mut dataset = Dataset::with_header(["Gross Revenue"]);
        dataset.push_row(vec![Value::Real(1.0)]).unwrap();
        assert!(AggregateReport::build(&dataset, CanonicalColumn::Country).is_none());
    }

    #[test]
    fn test_generate_all_charts() {
        let dir = tempfile::tempdir().unwrap();
        let charts_dir = dir.path().join("charts");

        let outcomes = generate_charts(&cleaned(), &charts_dir);
        assert_eq!(outcomes.len(), 4);
        for name in [
            "gross_revenue_by_company.svg",
            "net_profit_by_company.svg",
            "gross_revenue_by_country.svg",
            "net_profit_by_country.svg",
        ] {
            assert!(charts_dir.join(name).is_file(), "missing {}", name);
        }
    }

    #[test]
    fn test_charts_skipped_for_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut dataset = Dataset::with_header(["Company", "Gross Revenue"]);
        dataset.push_row(vec![text("Acme"), Value::Real(1.0)]).unwrap();

        let outcomes = generate_charts(&dataset, dir.path());
        let written = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ChartOutcome::Written(_)))
            .count();
        assert_eq!(written, 1);
        assert_eq!(outcomes.len(), 4);
    }

    #[test]
    fn test_charts_skipped_for_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::with_header(["Company", "Gross Revenue"]);

        let outcomes = generate_charts(&dataset, &dir.path().join("charts"));
        assert!(outcomes
            .iter()
            .all(|outcome| matches!(outcome, ChartOutcome::Skipped { .. })));
        assert!(!dir.path().join("charts").exists());
    }

    #[test]
    fn test_executive_summary() {
        let dataset = cleaned();
        let summary = ExecutiveSummary::build(Some(&dataset)).unwrap();
        assert_eq!(summary.companies, 2);
        assert_eq!(
            summary.totals,
            vec![
                ("Gross Revenue".to_string(), 6500.5),
                ("Net Profit".to_string(), 250.0)
            ]
        );

        let rendered = summary.render("€");
        assert!(rendered.contains("Consolidated indicators for 2 company(ies):"));
        assert!(rendered.contains("  - Gross Revenue                 : € 6,500.50"));
        assert!(rendered.starts_with(&format!("{}\n{:^50}\n{}\n", RULE, "EXECUTIVE SUMMARY", RULE)));
        assert!(rendered.ends_with(&format!("€ 250.00\n{}", RULE)));
    }

    #[test]
    fn test_summary_of_nothing() {
        assert!(ExecutiveSummary::build(None).is_none());
        let empty = Dataset::with_header(["Company"]);
        assert!(ExecutiveSummary::build(Some(&empty)).is_none());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency("€", 1234567.891), "€ 1,234,567.89");
        assert_eq!(format_currency("€", 0.0), "€ 0.00");
        assert_eq!(format_currency("€", 999.999), "€ 1,000.00");
        assert_eq!(format_currency("R$", -1234.5), "R$ -1,234.50");
        assert_eq!(format_currency("€", -0.001), "€ 0.00");
    }
}
