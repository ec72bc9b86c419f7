use crate::{
    column::ColumnSpec,
    options::WireFormat,
    processor::{
        CallbackTarget, Preloaded, Processor, RecordHooks, RowData, SkipRecord,
    },
    record::{Object, Record, Row},
    response::{RecordSerializer, SerializedRow, TableResponse},
    value::Value,
};
use serde_json::json;

fn records() -> Vec<Record> {
    (1..=3)
        .map(|pk| {
            Object::new(pk)
                .with("headline", format!("entry {pk}"))
                .with("first", "x")
                .with("last", "y")
                .with("featured", pk % 2 == 0)
                .into()
        })
        .collect()
}

fn columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("headline"),
        ColumnSpec::new("name").sources(["first", "last"]),
        ColumnSpec::new("featured"),
    ]
}

fn serialize(
    records: &[Record],
    processors: &[Option<Processor>],
    hooks: &RecordHooks,
    target: Option<&dyn CallbackTarget>,
) -> Vec<SerializedRow> {
    let columns = columns();
    RecordSerializer {
        columns: &columns,
        processors,
        hooks,
        target,
        view: Some("EntryList"),
    }
    .serialize_page(records)
}

#[test]
fn cells_are_plain_text_in_column_order() {
    let rows = serialize(&records()[..1], &[], &RecordHooks::new(), None);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cells, vec!["entry 1", "x y", "false"]);
    assert_eq!(rows[0].row_id, Value::Int(1));
    assert!(rows[0].row_data.is_empty());
}

#[test]
fn processors_receive_cell_and_context() {
    let upper = Processor::infallible(|_, cell, context| {
        Value::from(format!(
            "{}:{}:{}",
            context.index,
            context.view.unwrap_or_default(),
            cell.text.to_uppercase()
        ))
    });
    let rows = serialize(
        &records()[..1],
        &[None, Some(upper)],
        &RecordHooks::new(),
        None,
    );

    assert_eq!(rows[0].cells[1], "1:EntryList:X Y");
}

#[test]
fn skipped_records_are_omitted() {
    let skip_first = Processor::new(|record, cell, _| {
        if record.pk() == Value::Int(1) {
            Err(SkipRecord)
        } else {
            Ok(cell.raw.clone())
        }
    });
    let rows = serialize(&records(), &[Some(skip_first)], &RecordHooks::new(), None);

    let ids: Vec<Value> = rows.iter().map(|row| row.row_id.clone()).collect();
    assert_eq!(ids, vec![Value::Int(2), Value::Int(3)]);
}

#[test]
fn preload_hook_feeds_processors_and_can_skip() {
    let hooks = RecordHooks::new().with_preload(|record| {
        if record.pk() == Value::Int(3) {
            return Err(SkipRecord);
        }
        let mut data = Preloaded::new();
        data.insert("prefix".into(), Value::from("#"));
        Ok(data)
    });
    let prefixed = Processor::infallible(|_, cell, context| {
        let prefix = context.preloaded("prefix").map(ToString::to_string);
        Value::from(format!("{}{}", prefix.unwrap_or_default(), cell.text))
    });
    let rows = serialize(&records(), &[Some(prefixed)], &hooks, None);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].cells[0], "#entry 1");
}

struct View;

impl CallbackTarget for View {
    fn extra_record_data(&self, record: &Record) -> RowData {
        let mut data = RowData::new();
        data.insert("href".into(), json!(format!("/entry/{}", record.pk())));
        data
    }

    fn preload_record_data(&self, _record: &Record) -> Result<Preloaded, SkipRecord> {
        let mut data = Preloaded::new();
        data.insert("prefix".into(), Value::from("view:"));
        Ok(data)
    }
}

#[test]
fn target_hooks_override_table_hooks() {
    let hooks = RecordHooks::new()
        .with_preload(|_| Ok(Preloaded::from([("prefix".to_string(), Value::from("table:"))])))
        .with_extra_data(|_| {
            let mut data = RowData::new();
            data.insert("href".into(), json!("table"));
            data.insert("kind".into(), json!("entry"));
            data
        })
        .with_pk(|record| Value::from(format!("row-{}", record.pk())));
    let prefixed = Processor::infallible(|_, cell, context| {
        Value::from(format!(
            "{}{}",
            context.preloaded("prefix").map(ToString::to_string).unwrap_or_default(),
            cell.text
        ))
    });
    let rows = serialize(&records()[..1], &[Some(prefixed)], &hooks, Some(&View));

    assert_eq!(rows[0].cells[0], "view:entry 1");
    assert_eq!(rows[0].row_id, Value::from("row-1"));
    assert_eq!(rows[0].row_data["href"], json!("/entry/1"));
    assert_eq!(rows[0].row_data["kind"], json!("entry"));
}

#[test]
fn mapping_values_are_aliased_under_column_names() {
    let record = Record::mapping(
        Row::new()
            .with("pk", 9)
            .with("headline", "h")
            .with("first", "a")
            .with("last", "b"),
    );
    let echo_alias = Processor::infallible(|_, _, context| {
        context.preloaded("name").cloned().unwrap_or(Value::Null)
    });
    let rows = serialize(
        &[record],
        &[None, Some(echo_alias)],
        &RecordHooks::new(),
        None,
    );

    assert_eq!(rows[0].cells[1], "a, b");
    assert_eq!(rows[0].row_id, Value::Int(9));
}

#[test]
fn response_keys_follow_wire_format() {
    let row = SerializedRow {
        cells: vec!["a".into()],
        row_id: Value::Int(4),
        row_data: RowData::new(),
    };
    let mut response = TableResponse {
        echo: Some("3".into()),
        records_total: 10,
        records_filtered: 4,
        data: vec![row],
        wire_format: WireFormat::Modern,
    };

    assert_eq!(
        response.to_json().unwrap(),
        json!({
            "draw": "3",
            "recordsTotal": 10,
            "recordsFiltered": 4,
            "data": [{ "0": "a", "DT_RowId": 4, "DT_RowData": {} }],
        })
    );

    response.wire_format = WireFormat::Legacy;
    response.echo = None;
    let legacy = response.to_json().unwrap();
    assert_eq!(legacy["sEcho"], json!(null));
    assert_eq!(legacy["iTotalRecords"], json!(10));
    assert_eq!(legacy["iTotalDisplayRecords"], json!(4));
    assert_eq!(legacy["aaData"][0]["DT_RowId"], json!(4));
}
