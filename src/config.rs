use serde::{Deserialize, Serialize};

/// Rendering options for SQL generation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SqlConfig {
    /// Column bound to bare terms that carry no `field:` prefix.
    /// When unset, bare terms render as standalone quoted values.
    pub default_field: Option<String>,
}

impl SqlConfig {
    /// Create a configuration with no default field
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind bare terms to the given column. An empty name leaves bare
    /// terms unbound.
    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.default_field = if field.is_empty() { None } else { Some(field) };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SqlConfig::default();
        assert_eq!(config.default_field, None);
    }

    #[test]
    fn test_with_default_field() {
        let config = SqlConfig::new().with_default_field("content");
        assert_eq!(config.default_field.as_deref(), Some("content"));
    }

    #[test]
    fn test_empty_default_field_is_unset() {
        let config = SqlConfig::new().with_default_field("");
        assert_eq!(config.default_field, None);
    }
}
