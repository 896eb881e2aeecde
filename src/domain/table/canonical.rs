// ============================================================
// CANONICAL COLUMN SET
// ============================================================
// The fixed business schema the cleaning pipeline normalizes

use super::dataset::Dataset;

/// Sentinel written into textual canonical cells that were empty.
pub const NOT_INFORMED: &str = "Not Informed";

/// Target type of a canonical column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalColumn {
    Year,
    GrossRevenue,
    NetProfit,
    OperatingCost,
    EmployeeCount,
    Company,
    Country,
    Sector,
}

impl CanonicalColumn {
    pub const ALL: [CanonicalColumn; 8] = [
        CanonicalColumn::Year,
        CanonicalColumn::GrossRevenue,
        CanonicalColumn::NetProfit,
        CanonicalColumn::OperatingCost,
        CanonicalColumn::EmployeeCount,
        CanonicalColumn::Company,
        CanonicalColumn::Country,
        CanonicalColumn::Sector,
    ];

    /// Categorical columns rewritten to title case.
    pub const DIMENSIONS: [CanonicalColumn; 3] = [
        CanonicalColumn::Company,
        CanonicalColumn::Country,
        CanonicalColumn::Sector,
    ];

    /// Columns summed by the aggregate report. `Year` is a key, not a measure.
    pub const MEASURES: [CanonicalColumn; 4] = [
        CanonicalColumn::GrossRevenue,
        CanonicalColumn::NetProfit,
        CanonicalColumn::OperatingCost,
        CanonicalColumn::EmployeeCount,
    ];

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            CanonicalColumn::Year => "Year",
            CanonicalColumn::GrossRevenue => "Gross Revenue",
            CanonicalColumn::NetProfit => "Net Profit",
            CanonicalColumn::OperatingCost => "Operating Cost",
            CanonicalColumn::EmployeeCount => "Employee Count",
            CanonicalColumn::Company => "Company",
            CanonicalColumn::Country => "Country",
            CanonicalColumn::Sector => "Sector",
        }
    }

    /// Every header accepted for this column, English name first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalColumn::Year => &["Year", "Ano"],
            CanonicalColumn::GrossRevenue => &[
                "Gross Revenue",
                "Receita Total (receita bruta)",
                "Receita Total",
            ],
            CanonicalColumn::NetProfit => &["Net Profit", "Lucro Líquido"],
            CanonicalColumn::OperatingCost => &[
                "Operating Cost",
                "Custo Operacional (OPEX)",
                "Custo Operacional",
            ],
            CanonicalColumn::EmployeeCount => &["Employee Count", "Número de Funcionários"],
            CanonicalColumn::Company => &["Company", "Empresa"],
            CanonicalColumn::Country => &["Country", "País"],
            CanonicalColumn::Sector => &["Sector", "Setor"],
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            CanonicalColumn::Year | CanonicalColumn::EmployeeCount => ColumnKind::Integer,
            CanonicalColumn::GrossRevenue
            | CanonicalColumn::NetProfit
            | CanonicalColumn::OperatingCost => ColumnKind::Real,
            CanonicalColumn::Company | CanonicalColumn::Country | CanonicalColumn::Sector => {
                ColumnKind::Text
            }
        }
    }

    pub fn matches(self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        self.aliases()
            .iter()
            .any(|alias| alias.to_lowercase() == header)
    }

    /// Position of the first column in `dataset` carrying this column.
    pub fn find_in(self, dataset: &Dataset) -> Option<usize> {
        dataset
            .columns()
            .iter()
            .position(|header| self.matches(header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_matching_ignores_case_and_padding() {
        assert!(CanonicalColumn::GrossRevenue.matches(" receita total (receita bruta) "));
        assert!(CanonicalColumn::Country.matches("PAÍS"));
        assert!(CanonicalColumn::Company.matches("company"));
        assert!(!CanonicalColumn::Company.matches("Company Name"));
    }

    #[test]
    fn test_find_in_dataset() {
        let dataset = Dataset::with_header(["Empresa", "Ano", "Lucro Líquido"]);
        assert_eq!(CanonicalColumn::Year.find_in(&dataset), Some(1));
        assert_eq!(CanonicalColumn::Sector.find_in(&dataset), None);
    }
}
