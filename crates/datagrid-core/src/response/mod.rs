//! Response payload.
//!
//! Serialized rows keyed by column ordinal, plus the two record counters,
//! named according to the request's wire dialect.

mod serialize;

#[cfg(test)]
mod tests;

pub(crate) use serialize::RecordSerializer;

use crate::{options::WireFormat, processor::RowData, value::Value};
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::Value as JsonValue;

///
/// CONSTANTS
///

pub const ROW_ID_KEY: &str = "DT_RowId";
pub const ROW_DATA_KEY: &str = "DT_RowData";

///
/// SerializedRow
///
/// cells    → one string per declared column, in column order
/// row_id   → record identity
/// row_data → free-form row metadata
///

#[derive(Clone, Debug, PartialEq)]
pub struct SerializedRow {
    pub cells: Vec<String>,
    pub row_id: Value,
    pub row_data: RowData,
}

impl SerializedRow {
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = serde_json::Map::with_capacity(self.cells.len() + 2);
        for (index, cell) in self.cells.iter().enumerate() {
            map.insert(index.to_string(), JsonValue::String(cell.clone()));
        }
        map.insert(ROW_ID_KEY.to_string(), self.row_id.to_json());
        map.insert(ROW_DATA_KEY.to_string(), JsonValue::Object(self.row_data.clone()));

        JsonValue::Object(map)
    }
}

impl Serialize for SerializedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

///
/// TableResponse
///
/// `records_total` counts records before filtering; `records_filtered`
/// counts them after filtering and before paging. Rows skipped during
/// serialization are not subtracted from either.
///

#[derive(Clone, Debug, PartialEq)]
pub struct TableResponse {
    pub echo: Option<String>,
    pub records_total: usize,
    pub records_filtered: usize,
    pub data: Vec<SerializedRow>,
    pub wire_format: WireFormat,
}

impl TableResponse {
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for TableResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = self.wire_format;
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(wire.echo_key(), &self.echo)?;
        map.serialize_entry(wire.total_key(), &self.records_total)?;
        map.serialize_entry(wire.filtered_key(), &self.records_filtered)?;
        map.serialize_entry(wire.data_key(), &self.data)?;
        map.end()
    }
}
