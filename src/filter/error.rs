use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),
}

/// Identifiers are interpolated into SQL, so only `[A-Za-z_][A-Za-z0-9_]*` passes.
pub fn validate_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(validate_identifier("menu_id"));
        assert!(validate_identifier("_x1"));
        assert!(!validate_identifier(""));
        assert!(!validate_identifier("1abc"));
        assert!(!validate_identifier(" menu_id"));
        assert!(!validate_identifier("name\"; DROP TABLE menus; --"));
    }
}
