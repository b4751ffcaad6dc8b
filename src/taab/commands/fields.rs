use crate::commands::{CmdMessage, CmdResult};
use crate::model::{Category, Field, SchemaVariant};

/// Describes the form for one category, or for every category the schema
/// offers: which fields are shown and which of them must be filled in.
pub fn run(variant: SchemaVariant, category: Option<Category>) -> CmdResult {
    let categories: Vec<Category> = match category {
        Some(c) => vec![c],
        None => variant.categories().to_vec(),
    };

    let mut result = CmdResult::default();
    for category in categories {
        if !variant.categories().contains(&category) {
            result.add_message(CmdMessage::warning(format!(
                "{}: not offered by the {} schema",
                category, variant
            )));
            continue;
        }
        let required = variant.required_fields(category);
        let described: Vec<String> = variant
            .visible_fields(category)
            .into_iter()
            .map(|field| describe(field, &required))
            .collect();
        result.add_message(CmdMessage::info(format!(
            "{}: {}",
            category,
            described.join(", ")
        )));
    }
    result
}

fn describe(field: Field, required: &[Field]) -> String {
    if field == Field::CardId || required.contains(&field) {
        format!("{}*", field.label())
    } else {
        field.label().to_string()
    }
}
