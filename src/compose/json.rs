//! JSON rendering of composition output.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any composition value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Compose(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ComposeCommand;

    #[test]
    fn test_to_json_pretty() {
        let commands = vec![ComposeCommand::PageBreak { page: 1 }];
        let json = to_json(&commands, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"page_break\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let commands = vec![ComposeCommand::Close];
        let json = to_json(&commands, JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"[{"command":"close"}]"#);
    }
}
