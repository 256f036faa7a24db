use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{Map, Value};

/// JSON Schema for a tool's parameter struct, normalized by [`clean_schema`].
pub fn generate_param_schema<T: JsonSchema>() -> Value {
    let schema = SchemaSettings::draft2020_12()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator()
        .into_root_schema_for::<T>();

    let mut value = schema.to_value();
    clean_schema(&mut value);
    value
}

/// Normalize a schema in place, recursively:
/// string `title` annotations are dropped, a string `type` moves to the front,
/// and object nodes always carry a `required` list.
pub fn clean_schema(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            let entries = std::mem::take(map);
            let mut cleaned = Map::new();

            if let Some(kind @ Value::String(_)) = entries.get("type") {
                cleaned.insert("type".to_string(), kind.clone());
            }

            for (key, mut value) in entries {
                if key == "title" && value.is_string() {
                    continue;
                }
                if key == "type" && cleaned.contains_key("type") {
                    continue;
                }
                clean_schema(&mut value);
                cleaned.insert(key, value);
            }

            let is_object = cleaned.contains_key("properties")
                || cleaned.get("type").and_then(Value::as_str) == Some("object");
            if is_object && !cleaned.contains_key("required") {
                cleaned.insert("required".to_string(), Value::Array(Vec::new()));
            }

            *map = cleaned;
        }
        Value::Array(items) => items.iter_mut().for_each(clean_schema),
        _ => {}
    }
}
