use crate::error::ToolError;
use serde_json::{Map, Value};

pub mod retrieve_memory;
pub mod send_alert;
pub mod store_profile;

pub use retrieve_memory::RetrieveMemoryTool;
pub use send_alert::SendAlertTool;
pub use store_profile::StoreFarmerProfileTool;

fn as_object(args: &Value) -> Result<&Map<String, Value>, ToolError> {
    args.as_object()
        .ok_or_else(|| ToolError::InvalidArgument("arguments must be a JSON object".into()))
}

pub fn extract_string_arg(args: &Value, key: &str) -> Result<String, ToolError> {
    match as_object(args)?.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ToolError::InvalidArgument(format!(
            "'{}' must be a string",
            key
        ))),
        None => Err(ToolError::InvalidArgument(format!(
            "missing '{}' parameter",
            key
        ))),
    }
}

/// Absent, null and empty strings all read as `None`.
pub fn extract_string_arg_opt(args: &Value, key: &str) -> Result<Option<String>, ToolError> {
    match as_object(args)?.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ToolError::InvalidArgument(format!(
            "'{}' must be a string",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_arg_validation() {
        let args = json!({"info": "maize", "count": 3});
        assert_eq!(extract_string_arg(&args, "info").unwrap(), "maize");
        assert!(matches!(
            extract_string_arg(&args, "count"),
            Err(ToolError::InvalidArgument(_))
        ));
        assert!(matches!(
            extract_string_arg(&args, "missing"),
            Err(ToolError::InvalidArgument(_))
        ));
        assert!(matches!(
            extract_string_arg(&json!("maize"), "info"),
            Err(ToolError::InvalidArgument(_))
        ));
    }

    #[test]
    fn optional_arg_treats_blank_as_absent() {
        let args = json!({"email": "", "phone": null, "name": "Okello"});
        assert_eq!(extract_string_arg_opt(&args, "email").unwrap(), None);
        assert_eq!(extract_string_arg_opt(&args, "phone").unwrap(), None);
        assert_eq!(extract_string_arg_opt(&args, "other").unwrap(), None);
        assert_eq!(
            extract_string_arg_opt(&args, "name").unwrap().as_deref(),
            Some("Okello")
        );
    }
}
