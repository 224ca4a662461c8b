use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Objects render as key/value rows, except that a page (an object with an
/// `items` array) renders its items. Arrays render one row per element.
fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    let value = serde_json::to_value(value)?;
    Ok(match value {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => render_array(&items, options),
            _ => {
                let rows = map
                    .into_iter()
                    .map(|(key, value)| vec![key, to_cell(&value)])
                    .collect::<Vec<_>>();
                table::render_rows(&["key", "value"], &rows, options)
            }
        },
        Value::Array(items) => render_array(&items, options),
        scalar => table::render_rows(&["value"], &[vec![to_cell(&scalar)]], options),
    })
}

fn render_array(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    // Columns are the union of item keys.
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        let rows = items.iter().map(|v| vec![to_cell(v)]).collect::<Vec<_>>();
        return table::render_rows(&["value"], &rows, options);
    }

    let rows = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|h| item.get(h).map_or_else(|| String::from("-"), to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render_rows(&header_refs, &rows, options)
}

fn to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(v) => v.clone(),
        Value::Object(map) if map.contains_key("kind") && map.contains_key("id") => {
            // TargetRef
            format!(
                "{}:{}",
                map["kind"].as_str().unwrap_or_default(),
                map["id"].as_str().unwrap_or_default()
            )
        }
        other => other.to_string(),
    }
}
