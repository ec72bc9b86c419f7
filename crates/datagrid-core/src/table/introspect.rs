use crate::{
    column::{ColumnDeclaration, ColumnSpec, pretty_name},
    model::Schema,
    options::TableOptions,
    processor::ProcessorRef,
};

///
/// Build one column per schema field.
///
/// Without a `columns` selection every non-relation field is used, in
/// schema order; relation fields only appear when named. A selection keeps
/// its own order, and names the schema does not know are left for declared
/// columns to supply.
///
#[must_use]
pub fn columns_for_schema(schema: &Schema, options: &TableOptions) -> Vec<ColumnSpec> {
    let exclude = options.exclude.as_deref().unwrap_or_default();
    let selected = options.columns.as_ref().map(|declarations| {
        declarations
            .iter()
            .filter_map(|declaration| match declaration {
                ColumnDeclaration::Name(name) => Some(name.trim()),
                _ => None,
            })
            .collect::<Vec<_>>()
    });

    let fields: Vec<_> = match &selected {
        Some(names) => names
            .iter()
            .filter_map(|name| schema.fields.iter().find(|field| field.name == *name))
            .collect(),
        None => schema
            .fields
            .iter()
            .filter(|field| !field.kind.is_relation())
            .collect(),
    };

    fields
        .into_iter()
        .filter(|field| !exclude.contains(&field.name))
        .map(|field| {
            let verbose = field.verbose_name.as_deref().unwrap_or(&field.name);
            let label = options
                .labels
                .as_ref()
                .and_then(|labels| labels.get(&field.name).cloned())
                .unwrap_or_else(|| pretty_name(verbose));
            let mut column = ColumnSpec::new(field.name.clone()).label(label);

            if let Some(name) = options
                .processors
                .as_ref()
                .and_then(|processors| processors.get(&field.name))
            {
                column = column.processor(ProcessorRef::named(name.clone()));
            }
            if options.unsortable_columns().contains(&field.name) {
                column = column.unsortable();
            }
            if options.hidden_columns().contains(&field.name) {
                column = column.hidden();
            }

            column
        })
        .collect()
}
