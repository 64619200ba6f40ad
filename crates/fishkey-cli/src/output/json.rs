use std::io;

use fishkey_core::contracts::envelope::failure_from_error;
use fishkey_core::{FishkeyError, SuccessEnvelope};
use serde::Serialize;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &FishkeyError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use fishkey_core::{FishkeyError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    #[test]
    fn success_json_is_the_full_envelope() {
        let payload = SuccessEnvelope {
            ok: true,
            command: "key".to_string(),
            version: "0.1.0".to_string(),
            data: json!({"comparison_key": "COD|-|LOIN|-|-|-|-|-|-|-"}),
        };
        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["command"], "key");
                assert_eq!(value["data"]["comparison_key"], "COD|-|LOIN|-|-|-|-|-|-|-");
            }
        }
    }

    #[test]
    fn error_json_carries_code_and_recovery() {
        let error = FishkeyError::new("unknown_category", "missing", vec!["run species".to_string()]);
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(false));
                assert_eq!(value["error"]["code"], "unknown_category");
                assert_eq!(value["error"]["recovery_steps"][0], "run species");
                assert!(value.get("data").is_none());
            }
        }
    }
}
