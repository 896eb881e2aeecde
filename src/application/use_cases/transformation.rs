// ============================================================
// TRANSFORMATION PIPELINE
// ============================================================
// Four ordered, idempotent cleaning stages over an extracted table:
// coercion -> null fill -> title case -> de-duplication

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::table::{CanonicalColumn, ColumnKind, Dataset, Value, NOT_INFORMED};

/// Counts of what each stage changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub coerced_to_null: usize,
    pub nulls_filled: usize,
    pub values_recased: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Default)]
pub struct TransformationPipeline;

impl TransformationPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Clean `dataset`. An absent input yields nothing so the caller drops
    /// the file.
    pub fn run(&self, dataset: Option<Dataset>) -> Option<(Dataset, TransformReport)> {
        let mut dataset = dataset?;
        let report = self.apply(&mut dataset);
        Some((dataset, report))
    }

    pub fn apply(&self, dataset: &mut Dataset) -> TransformReport {
        let roles = column_roles(dataset);

        let report = TransformReport {
            coerced_to_null: coerce_types(dataset, &roles),
            nulls_filled: fill_nulls(dataset, &roles),
            values_recased: standardize_categories(dataset, &roles),
            duplicates_removed: dataset.dedup_rows(),
        };

        info!(
            rows = dataset.len(),
            coerced_to_null = report.coerced_to_null,
            nulls_filled = report.nulls_filled,
            values_recased = report.values_recased,
            duplicates_removed = report.duplicates_removed,
            "Dataset cleaned"
        );
        report
    }
}

/// Canonical role of each column. When several headers alias the same
/// canonical column only the first one takes the role.
fn column_roles(dataset: &Dataset) -> Vec<Option<CanonicalColumn>> {
    let mut roles = vec![None; dataset.width()];
    for column in CanonicalColumn::ALL {
        match column.find_in(dataset) {
            Some(index) => roles[index] = Some(column),
            None => debug!(column = column.name(), "Canonical column absent"),
        }
    }
    roles
}

/// Stage 1: numeric canonical columns hold numbers or null, textual ones text
/// or null. Unparseable text becomes null.
fn coerce_types(dataset: &mut Dataset, roles: &[Option<CanonicalColumn>]) -> usize {
    let mut coerced_to_null = 0;

    for (index, role) in roles.iter().enumerate() {
        let Some(column) = role else { continue };
        let kind = column.kind();

        for value in dataset.column_values_mut(index) {
            let coerced = match (kind, &*value) {
                (_, Value::Null) => continue,
                (ColumnKind::Integer | ColumnKind::Real, Value::Text(text)) => {
                    match Value::parse_number(text) {
                        Some(number) => number,
                        None => {
                            coerced_to_null += 1;
                            Value::Null
                        }
                    }
                }
                (ColumnKind::Text, Value::Int(_) | Value::Real(_)) => Value::Text(value.render()),
                _ => continue,
            };
            *value = coerced;
        }

        if kind == ColumnKind::Real {
            for value in dataset.column_values_mut(index) {
                if let Value::Int(int) = *value {
                    *value = Value::Real(int as f64);
                }
            }
        }
    }

    coerced_to_null
}

/// Stage 2: fill nulls by column type, then cast canonical integer columns.
fn fill_nulls(dataset: &mut Dataset, roles: &[Option<CanonicalColumn>]) -> usize {
    let mut filled = 0;

    for (index, role) in roles.iter().enumerate() {
        let fill = match role.map(|column| column.kind()) {
            Some(ColumnKind::Integer) => Value::Int(0),
            Some(ColumnKind::Real) => Value::Real(0.0),
            Some(ColumnKind::Text) => Value::Text(NOT_INFORMED.to_string()),
            None => inferred_fill(dataset, index),
        };

        for value in dataset.column_values_mut(index) {
            if value.is_null() {
                *value = fill.clone();
                filled += 1;
            }
        }

        if role.map(|column| column.kind()) == Some(ColumnKind::Integer) {
            for value in dataset.column_values_mut(index) {
                if let Value::Real(real) = *value {
                    *value = Value::Int(real.trunc() as i64);
                }
            }
        }
    }

    filled
}

/// Fill value for a column outside the canonical set: numeric when every
/// present value is a number, text otherwise.
fn inferred_fill(dataset: &Dataset, index: usize) -> Value {
    let mut all_int = true;
    for value in dataset.column_values(index) {
        match value {
            Value::Null | Value::Int(_) => {}
            Value::Real(_) => all_int = false,
            Value::Text(_) => return Value::Text(NOT_INFORMED.to_string()),
        }
    }

    if all_int {
        Value::Int(0)
    } else {
        Value::Real(0.0)
    }
}

/// Stage 3: title case every categorical dimension value.
fn standardize_categories(dataset: &mut Dataset, roles: &[Option<CanonicalColumn>]) -> usize {
    let mut recased = 0;

    for (index, role) in roles.iter().enumerate() {
        if !matches!(role, Some(column) if CanonicalColumn::DIMENSIONS.contains(column)) {
            continue;
        }
        for value in dataset.column_values_mut(index) {
            if let Value::Text(text) = value {
                let titled = title_case(text);
                if titled != *text {
                    *text = titled;
                    recased += 1;
                }
            }
        }
    }

    recased
}

/// Upper-case the first letter of every word and lower-case the rest. A word
/// starts after any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                titled.extend(ch.to_lowercase());
            } else {
                let mut upper = ch.to_uppercase();
                if let Some(first) = upper.next() {
                    titled.push(first);
                }
                for rest in upper {
                    titled.extend(rest.to_lowercase());
                }
            }
            in_word = true;
        } else {
            titled.push(ch);
            in_word = false;
        }
    }

    titled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    fn raw_sales() -> Dataset {
        let mut dataset = Dataset::with_header([
            "Company",
            "Country",
            "Year",
            "Gross Revenue",
            "Employee Count",
            "Branch",
        ]);
        let rows = vec![
            vec![text("acme corp"), text("BRAZIL"), Value::Int(2020), Value::Int(1000), Value::Real(10.7), text("north")],
            vec![text("acme corp"), text("BRAZIL"), Value::Int(2020), Value::Int(1000), Value::Real(10.7), text("north")],
            vec![text("beta ltd"), Value::Null, Value::Real(2021.0), text("n/d"), Value::Null, Value::Null],
            vec![Value::Null, text("portugal"), text("2022"), Value::Real(55.5), Value::Int(3), text("south")],
        ];
        for row in rows {
            dataset.push_row(row).unwrap();
        }
        dataset
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("acme corp"), "Acme Corp");
        assert_eq!(title_case("ACME CORP"), "Acme Corp");
        assert_eq!(title_case("o'neil-smith"), "O'Neil-Smith");
        assert_eq!(title_case("são paulo"), "São Paulo");
        assert_eq!(title_case("ßeta"), "Sseta");
        assert_eq!(title_case(&title_case("ßeta")), "Sseta");
    }

    #[test]
    fn test_absent_input_short_circuits() {
        assert!(TransformationPipeline::new().run(None).is_none());
    }

    #[test]
    fn test_clean_dataset_guarantees() {
        let (dataset, report) = TransformationPipeline::new().run(Some(raw_sales())).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.coerced_to_null, 1);

        let year = dataset.column_index("Year").unwrap();
        let employees = dataset.column_index("Employee Count").unwrap();
        let revenue = dataset.column_index("Gross Revenue").unwrap();
        assert!(dataset.column_values(year).all(|v| matches!(v, Value::Int(_))));
        assert!(dataset.column_values(employees).all(|v| matches!(v, Value::Int(_))));
        assert!(dataset.column_values(revenue).all(|v| matches!(v, Value::Real(_))));
        assert!(dataset.rows().iter().flatten().all(|v| !v.is_null()));

        assert_eq!(
            dataset.rows()[0],
            vec![text("Acme Corp"), text("Brazil"), Value::Int(2020), Value::Real(1000.0), Value::Int(10), text("north")]
        );
        assert_eq!(
            dataset.rows()[1],
            vec![text("Beta Ltd"), text(NOT_INFORMED), Value::Int(2021), Value::Real(0.0), Value::Int(0), text(NOT_INFORMED)]
        );
        assert_eq!(dataset.rows()[2][0], text(NOT_INFORMED));
        assert_eq!(dataset.rows()[2][2], Value::Int(2022));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let pipeline = TransformationPipeline::new();
        let (once, _) = pipeline.run(Some(raw_sales())).unwrap();
        let (twice, report) = pipeline.run(Some(once.clone())).unwrap();

        assert_eq!(once, twice);
        assert_eq!(report, TransformReport::default());
    }

    #[test]
    fn test_cleaning_a_saved_file_again_gives_identical_bytes() {
        use crate::infrastructure::csv::{write_csv, CsvParser};

        let dir = tempfile::tempdir().unwrap();
        let first_path = dir.path().join("first.csv");
        let second_path = dir.path().join("second.csv");
        let pipeline = TransformationPipeline::new();

        let (once, _) = pipeline.run(Some(raw_sales())).unwrap();
        write_csv(&once, &first_path).unwrap();

        let reread = CsvParser::new().parse_file(&first_path).unwrap();
        let (twice, _) = pipeline.run(Some(reread)).unwrap();
        write_csv(&twice, &second_path).unwrap();

        assert_eq!(
            std::fs::read(&first_path).unwrap(),
            std::fs::read(&second_path).unwrap()
        );
    }

    #[test]
    fn test_dedup_keeps_first_and_order() {
        let mut dataset = Dataset::with_header(["Label", "N"]);
        for (label, n) in [("A", 1), ("A", 1), ("B", 2)] {
            dataset.push_row(vec![text(label), Value::Int(n)]).unwrap();
        }

        let (dataset, _) = TransformationPipeline::new().run(Some(dataset)).unwrap();
        assert_eq!(
            dataset.rows(),
            &[vec![text("A"), Value::Int(1)], vec![text("B"), Value::Int(2)]]
        );
    }

    #[test]
    fn test_portuguese_headers_are_canonical() {
        let mut dataset = Dataset::with_header(["Empresa", "Ano", "Lucro Líquido"]);
        dataset
            .push_row(vec![text("açaí ltda"), Value::Null, Value::Int(7)])
            .unwrap();

        let (dataset, _) = TransformationPipeline::new().run(Some(dataset)).unwrap();
        assert_eq!(
            dataset.rows()[0],
            vec![text("Açaí Ltda"), Value::Int(0), Value::Real(7.0)]
        );
    }

    #[test]
    fn test_numeric_company_values_become_text() {
        let mut dataset = Dataset::with_header(["Company", "Score"]);
        dataset.push_row(vec![Value::Int(42), Value::Null]).unwrap();
        dataset.push_row(vec![text("x"), Value::Real(1.5)]).unwrap();

        let (dataset, _) = TransformationPipeline::new().run(Some(dataset)).unwrap();
        assert_eq!(dataset.rows()[0], vec![text("42"), Value::Real(0.0)]);
    }
}
