use crate::{
    column::ColumnSpec,
    processor::{
        CallbackTarget, Preloaded, Processor, ProcessorContext, RecordHooks, SkipRecord,
    },
    record::Record,
    response::SerializedRow,
    value::Value,
};
use log::debug;

///
/// RecordSerializer
///
/// Turns page records into rows: extract every column, run its processor
/// and render the result as a string. A skip signal from a hook or a
/// processor drops the whole record.
///

pub(crate) struct RecordSerializer<'a> {
    pub columns: &'a [ColumnSpec],

    /// Resolved processor per column, parallel to `columns`.
    pub processors: &'a [Option<Processor>],
    pub hooks: &'a RecordHooks,
    pub target: Option<&'a dyn CallbackTarget>,
    pub view: Option<&'a str>,
}

impl RecordSerializer<'_> {
    pub fn serialize_page(&self, records: &[Record]) -> Vec<SerializedRow> {
        records
            .iter()
            .filter_map(|record| match self.serialize(record) {
                Ok(row) => Some(row),
                Err(SkipRecord) => {
                    debug!("record {} skipped during serialization", record.pk());
                    None
                }
            })
            .collect()
    }

    pub fn serialize(&self, record: &Record) -> Result<SerializedRow, SkipRecord> {
        let preloaded = self.preload(record)?;
        let mut cells = Vec::with_capacity(self.columns.len());

        for (index, column) in self.columns.iter().enumerate() {
            let cell = column.extract(record);
            let text = match self.processors.get(index).and_then(Option::as_ref) {
                Some(processor) => {
                    let context = ProcessorContext {
                        field_name: &column.name,
                        index,
                        localize: column.localize,
                        view: self.view,
                        preloaded: &preloaded,
                    };
                    processor.call(record, &cell, &context)?.to_string()
                }
                None => cell.text,
            };
            cells.push(text);
        }

        let mut row_data = self.hooks.extra_data(record);
        if let Some(target) = self.target {
            row_data.extend(target.extra_record_data(record));
        }

        Ok(SerializedRow {
            cells,
            row_id: self.hooks.pk(record),
            row_data,
        })
    }

    // Mapping aliases, then the table hook, then the callback target; later
    // entries win.
    fn preload(&self, record: &Record) -> Result<Preloaded, SkipRecord> {
        let mut preloaded = Preloaded::new();

        if record.as_row().is_some() {
            for column in self.columns {
                let mut values: Vec<Value> =
                    column.paths().map(|path| record.value_at(path)).collect();
                let alias = match values.len() {
                    0 => continue,
                    1 => values.swap_remove(0),
                    _ => Value::List(values),
                };
                preloaded.insert(column.name.clone(), alias);
            }
        }

        preloaded.extend(self.hooks.preload(record)?);
        if let Some(target) = self.target {
            preloaded.extend(target.preload_record_data(record)?);
        }

        Ok(preloaded)
    }
}
