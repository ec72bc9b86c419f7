use super::*;
use crate::core::{
    column::ColumnSpec,
    processor::{Preloaded, ProcessorContext},
    record::{Method, Object, Record, Row},
};
use time::macros::{date, datetime};

fn entry() -> Record {
    let blog = Object::new(3)
        .with_display("Rust Notes")
        .with_url("/blogs/3/")
        .shared();

    Object::new(7)
        .with("headline", "Lifetimes explained")
        .with("featured", true)
        .with("archived", false)
        .with("pub_date", date!(2020 - 02 - 14))
        .with("updated", datetime!(2021 - 03 - 04 10:30))
        .with("rating", 4)
        .with_method("summary", Method::value(|| "short"))
        .with_related("blog", blog)
        .with_display("Entry 7")
        .with_url("/entries/7/")
        .into()
}

fn run(processor: &Processor, record: &Record, column: &ColumnSpec) -> Value {
    let cell = column.extract(record);
    let preloaded = Preloaded::new();
    let context = ProcessorContext {
        field_name: &column.name,
        index: 0,
        localize: false,
        view: None,
        preloaded: &preloaded,
    };

    processor.call(record, &cell, &context).unwrap()
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

///
/// Links
///

#[test]
fn link_wraps_cell_text_in_record_url() {
    let value = run(&link_to_model(), &entry(), &ColumnSpec::new("headline"));

    assert_eq!(
        value,
        text(r#"<a href="/entries/7/">Lifetimes explained</a>"#)
    );
}

#[test]
fn link_falls_back_to_display_text() {
    let column = ColumnSpec::new("subtitle");
    let value = run(&link_to_model(), &entry(), &column);

    assert_eq!(value, text(r#"<a href="/entries/7/">Entry 7</a>"#));
}

#[test]
fn link_to_related_targets_the_related_entity() {
    let column = ColumnSpec::new("blog");
    let value = run(&link_to_related("blog"), &entry(), &column);

    assert_eq!(value, text(r#"<a href="/blogs/3/">Rust Notes</a>"#));
}

#[test]
fn mapping_records_are_never_linked() {
    let record = Record::mapping(Row::new().with("pk", 1).with("headline", "plain"));
    let value = run(&link_to_model(), &record, &ColumnSpec::new("headline"));

    assert_eq!(value, text("plain"));
}

///
/// Checkmarks
///

#[test]
fn checkmark_follows_truthiness() {
    let record = entry();

    assert_eq!(
        run(&boolean_checkmark(), &record, &ColumnSpec::new("featured")),
        text(CHECK_MARK)
    );
    assert_eq!(
        run(&boolean_checkmark(), &record, &ColumnSpec::new("archived")),
        text(CROSS_MARK)
    );

    let custom = boolean_checkmark_with("yes", "");
    assert_eq!(
        run(&custom, &record, &ColumnSpec::new("pub_date")),
        text("yes")
    );
}

///
/// Item access
///

#[test]
fn item_getter_indexes_text_and_lists() {
    let record = entry();

    let first = item_getter(0_usize, None);
    assert_eq!(run(&first, &record, &ColumnSpec::new("headline")), text("L"));

    let compound = ColumnSpec::new("both").sources(["headline", "rating"]);
    let second = item_getter(1_usize, None);
    assert_eq!(run(&second, &record, &compound), Value::Int(4));

    let missing = item_getter(99_usize, None);
    assert_eq!(run(&missing, &record, &compound), Value::Null);
}

#[test]
fn item_getter_slices_with_ellipsis() {
    let record = entry();
    let column = ColumnSpec::new("headline");

    let cut = item_getter(..9_usize, Some("..."));
    assert_eq!(run(&cut, &record, &column), text("Lifetimes..."));

    let whole = item_getter(..100_usize, Some("..."));
    assert_eq!(
        run(&whole, &record, &column),
        text("Lifetimes explained")
    );

    let tail = item_getter(10_usize.., None);
    assert_eq!(run(&tail, &record, &column), text("explained"));
}

///
/// Attribute access
///

#[test]
fn attr_getter_walks_paths_and_methods() {
    let record = entry();
    let column = ColumnSpec::new("headline");

    assert_eq!(run(&attr_getter("summary"), &record, &column), text("short"));
    assert_eq!(run(&attr_getter("blog"), &record, &column), text("Rust Notes"));
    assert_eq!(run(&attr_getter("blog.pk"), &record, &column), Value::Int(3));
    assert_eq!(run(&attr_getter("nope"), &record, &column), Value::Null);
}

///
/// Formatting
///

#[test]
fn format_date_handles_dates_and_datetimes() {
    let record = entry();
    let processor = format_date("[day]/[month]/[year]").unwrap();

    assert_eq!(
        run(&processor, &record, &ColumnSpec::new("pub_date")),
        text("14/02/2020")
    );
    assert_eq!(
        run(&processor, &record, &ColumnSpec::new("updated")),
        text("04/03/2021")
    );
    assert_eq!(
        run(&processor, &record, &ColumnSpec::new("headline")),
        text("Lifetimes explained")
    );
}

#[test]
fn format_date_rejects_bad_descriptions() {
    assert!(format_date("[nonsense]").is_err());
}

#[test]
fn format_date_keeps_dates_missing_requested_components() {
    let processor = format_date("[hour]:[minute]").unwrap();
    let value = run(&processor, &entry(), &ColumnSpec::new("pub_date"));

    assert_eq!(value, Value::Date(date!(2020 - 02 - 14)));
}

#[test]
fn format_value_fills_template() {
    let value = run(
        &format_value("#{} stars"),
        &entry(),
        &ColumnSpec::new("rating"),
    );

    assert_eq!(value, text("#4 stars"));
}

#[test]
fn through_filter_sees_only_raw_value() {
    let double = through_filter(|value| match value {
        Value::Int(n) => Value::Int(n * 2),
        other => other.clone(),
    });

    assert_eq!(
        run(&double, &entry(), &ColumnSpec::new("rating")),
        Value::Int(8)
    );
}
