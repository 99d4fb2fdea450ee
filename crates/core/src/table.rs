//! Row tables for plans that ask the generator for `PREFIX-n: a | b | c` lines.

use serde::Serialize;

use crate::extract::extract_rows;

/// A table column and the cell used when a row leaves it blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub fallback: String,
}

impl Column {
    pub fn new(name: &str, fallback: &str) -> Self {
        Self {
            name: name.to_string(),
            fallback: fallback.to_string(),
        }
    }
}

/// Where to find a table and how to complete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Output name of the table.
    pub name: String,
    /// Text identifying the `**SECTION ...**` header.
    pub section: String,
    /// Prefix of each row line, e.g. `MED-`.
    pub prefix: String,
    pub columns: Vec<Column>,
    /// Label of synthesized rows, numbered from the first missing row.
    pub row_label: String,
    pub min_rows: usize,
    pub max_rows: usize,
}

/// A completed table: column names plus rows of exactly that width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Extract the rows of `spec` from `text` and complete them.
///
/// Blank or missing cells take the column fallback; extra cells are
/// dropped. The table is padded to `min_rows` with synthesized rows whose
/// first cell is `"<row_label> <n>"` and truncated to `max_rows`.
pub fn build_table(text: &str, spec: &TableSpec) -> Table {
    let mut rows: Vec<Vec<String>> = extract_rows(text, &spec.section, &spec.prefix)
        .into_iter()
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .map(|cells| complete_row(cells, &spec.columns))
        .collect();

    while rows.len() < spec.min_rows {
        let mut row = fallback_row(&spec.columns);
        if let Some(first) = row.first_mut() {
            *first = format!("{} {}", spec.row_label, rows.len() + 1);
        }
        rows.push(row);
    }
    rows.truncate(spec.max_rows);

    Table {
        columns: spec.columns.iter().map(|c| c.name.clone()).collect(),
        rows,
    }
}

fn complete_row(cells: Vec<String>, columns: &[Column]) -> Vec<String> {
    let mut cells = cells.into_iter();
    columns
        .iter()
        .map(|column| match cells.next() {
            Some(cell) if !cell.is_empty() => cell,
            _ => column.fallback.clone(),
        })
        .collect()
}

fn fallback_row(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.fallback.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medications() -> TableSpec {
        TableSpec {
            name: "medications".to_string(),
            section: "DIABETES MEDICATIONS".to_string(),
            prefix: "MED-".to_string(),
            columns: vec![
                Column::new("name", "Diabetes medication"),
                Column::new("dosage", "As prescribed"),
                Column::new("price", "₹50-500"),
            ],
            row_label: "Diabetes Medicine".to_string(),
            min_rows: 3,
            max_rows: 4,
        }
    }

    #[test]
    fn pads_to_minimum_with_numbered_rows() {
        let text = "**SECTION 1: DIABETES MEDICATIONS**\nMED-1: Metformin | | ₹40\n";
        let table = build_table(text, &medications());

        assert_eq!(table.columns, vec!["name", "dosage", "price"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["Metformin", "As prescribed", "₹40"],
                vec!["Diabetes Medicine 2", "As prescribed", "₹50-500"],
                vec!["Diabetes Medicine 3", "As prescribed", "₹50-500"],
            ]
        );
    }

    #[test]
    fn truncates_to_maximum_and_width() {
        let text = "**SECTION 1: DIABETES MEDICATIONS**
MED-1: A | 1 | 2 | extra
MED-2: B
MED-3: C
MED-4: D
MED-5: E";
        let table = build_table(text, &medications());

        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0], vec!["A", "1", "2"]);
        assert_eq!(table.rows[1], vec!["B", "As prescribed", "₹50-500"]);
    }

    #[test]
    fn empty_text_gives_full_fallback_table() {
        let table = build_table("", &medications());
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "Diabetes Medicine 1");
    }
}
