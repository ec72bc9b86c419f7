//! Table structure descriptor.
//!
//! Column metadata for whatever renders the table skeleton. Pure function
//! of the request's annotated columns; no record access.

use crate::{column::ColumnSpec, query::OrderDirection};
use serde::Serialize;
use std::{collections::BTreeMap, fmt::Write as _};

///
/// SortState
/// Position of a column in the active ordering.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SortState {
    pub priority: usize,
    pub index: usize,
    pub direction: OrderDirection,
}

///
/// ColumnInfo
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub label: String,
    pub sortable: bool,
    pub visible: bool,
    pub sorting: Option<SortState>,
}

impl ColumnInfo {
    #[must_use]
    pub fn from_column(column: &ColumnSpec) -> Self {
        let sorting = match (column.sort_priority, column.index, column.sort_direction) {
            (Some(priority), Some(index), Some(direction)) => Some(SortState {
                priority,
                index,
                direction,
            }),
            _ => None,
        };

        Self {
            name: column.name.clone(),
            label: column.label.clone(),
            sortable: column.sortable,
            visible: column.visible,
            sorting,
        }
    }

    /// `data-config-*` attributes describing the initial widget state.
    #[must_use]
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attributes = BTreeMap::new();
        attributes.insert("data-config-sortable", self.sortable.to_string());
        attributes.insert("data-config-visible", self.visible.to_string());

        if let Some(SortState {
            priority,
            index,
            direction,
        }) = self.sorting
        {
            attributes.insert("data-config-sorting", format!("{priority},{index},{direction}"));
        }

        attributes
    }

    /// Attributes as one markup string: ` key="value"` per entry.
    #[must_use]
    pub fn flat_attributes(&self) -> String {
        self.attributes()
            .into_iter()
            .fold(String::new(), |mut out, (key, value)| {
                let _ = write!(out, " {key}=\"{}\"", escape(&value));
                out
            })
    }
}

/// Describe every column, in declaration order.
#[must_use]
pub fn describe(columns: &[ColumnSpec]) -> Vec<ColumnInfo> {
    columns.iter().map(ColumnInfo::from_column).collect()
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsorted_column_has_no_sorting_attribute() {
        let info = ColumnInfo::from_column(&ColumnSpec::new("headline"));

        assert_eq!(
            info.flat_attributes(),
            r#" data-config-sortable="true" data-config-visible="true""#
        );
    }

    #[test]
    fn sorted_column_reports_priority_index_direction() {
        let mut column = ColumnSpec::new("pub_date").hidden();
        column.sort_priority = Some(0);
        column.index = Some(3);
        column.sort_direction = Some(OrderDirection::Desc);

        let attributes = ColumnInfo::from_column(&column).attributes();
        assert_eq!(attributes["data-config-sorting"], "0,3,desc");
        assert_eq!(attributes["data-config-visible"], "false");
    }

    #[test]
    fn display_columns_are_unsortable() {
        let infos = describe(&[ColumnSpec::display("actions").label("<Actions>")]);

        assert!(!infos[0].sortable);
        assert_eq!(infos[0].label, "<Actions>");
        assert_eq!(escape(&infos[0].label), "&lt;Actions&gt;");
    }
}
