use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&success_body(message, data))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print one line per item in text mode, or the whole list under `key` in JSON mode
pub fn output_list(
    output_format: &OutputFormat,
    key: &str,
    items: &[String],
    empty_message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ key: items }))?);
        }
        OutputFormat::Text if items.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => items.iter().for_each(|item| println!("  {}", item)),
    }
    Ok(())
}

/// Object fields of `data` are merged next to `success` and `message`
fn success_body(message: &str, data: Option<Value>) -> Value {
    let mut response = json!({
        "success": true,
        "message": message
    });

    match data {
        Some(Value::Object(fields)) => {
            if let Value::Object(body) = &mut response {
                body.extend(fields);
            }
        }
        Some(other) => response["data"] = other,
        None => {}
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_object_data_into_body() {
        let body = success_body("Created", Some(json!({ "id": 7 })));
        assert_eq!(body, json!({ "success": true, "message": "Created", "id": 7 }));
    }

    #[test]
    fn non_object_data_goes_under_data() {
        let body = success_body("Listed", Some(json!([1, 2])));
        assert_eq!(body["data"], json!([1, 2]));
        assert_eq!(success_body("Done", None), json!({ "success": true, "message": "Done" }));
    }
}
