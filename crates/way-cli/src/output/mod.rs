use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
///
/// # Errors
///
/// Returns an error when the value cannot be serialized to JSON.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_value_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
///
/// # Errors
///
/// Returns an error when the value cannot be serialized to JSON.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_value_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_rows(&items, options)),
        Value::Object(map) => {
            let rows = map
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_table(&["key", "value"], &rows, options))
        }
        scalar => Ok(value_to_cell(&scalar)),
    }
}

fn render_rows(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, options);
    }

    let mut headers = Vec::<String>::new();
    for item in items {
        if let Some(map) = item.as_object() {
            for key in map.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_table(&header_refs, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        venue: &'static str,
        count: u32,
    }

    #[test]
    fn json_render_is_valid_pretty_json() {
        let out = render(
            &Example {
                venue: "Corner Coffee",
                count: 7,
            },
            OutputFormat::Json,
        )
        .expect("render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("parse");
        assert_eq!(parsed["venue"], "Corner Coffee");
        assert_eq!(parsed["count"], 7);
        assert!(out.contains('\n'));
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(
            &Example {
                venue: "Pier 11",
                count: 1,
            },
            OutputFormat::Raw,
        )
        .expect("render");
        assert!(!out.contains('\n'));
        serde_json::from_str::<serde_json::Value>(&out).expect("parse");
    }

    #[test]
    fn table_render_for_object_is_key_value() {
        let out = render(
            &Example {
                venue: "Pier 11",
                count: 1,
            },
            OutputFormat::Table,
        )
        .expect("render");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("venue"));
        assert!(out.contains("Pier 11"));
    }

    #[test]
    fn table_render_for_array_uses_field_columns() {
        let rows = vec![
            Example {
                venue: "Corner Coffee",
                count: 3,
            },
            Example {
                venue: "Pier 11",
                count: 9,
            },
        ];
        let out = render(&rows, OutputFormat::Table).expect("render");
        let header = out.lines().next().expect("header");
        assert!(header.contains("venue"));
        assert!(header.contains("count"));
        assert!(out.contains("Pier 11"));
    }

    #[test]
    fn empty_array_renders_a_placeholder() {
        let rows: Vec<Example> = Vec::new();
        let out = render(&rows, OutputFormat::Table).expect("render");
        assert_eq!(out, "(no rows)");
    }
}
