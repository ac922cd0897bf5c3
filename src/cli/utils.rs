use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Print a success line, or a `{success, message, ...data}` object in JSON mode
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".into(), json!(true));
            response.insert("message".into(), json!(message));
            match data {
                Some(Value::Object(fields)) => response.extend(fields),
                Some(other) => {
                    response.insert("data".into(), other);
                }
                None => {}
            }
            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => println!("✓ {}", message),
    }
    Ok(())
}

/// Print a collection; `render` formats one row in text mode
pub fn output_collection<T, F>(
    output_format: OutputFormat,
    collection_name: &str,
    items: &[T],
    empty_message: &str,
    render: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text if items.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for item in items {
                println!("{}", render(item));
            }
        }
    }
    Ok(())
}
