use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("value range is empty: start and end are both {0}")]
    EmptyRange(i32),

    #[error("divider step must be a percentage in 1..=100, got {0}")]
    InvalidDividerStep(i32),

    #[error("divider size {size} does not fit into a value range of {range}")]
    DividerTooLarge { size: i32, range: i32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidDimension { field: &'static str, value: f32 },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GaugeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_range() {
        let err = GaugeError::EmptyRange(5);
        assert_eq!(
            err.to_string(),
            "value range is empty: start and end are both 5"
        );
    }

    #[test]
    fn test_error_display_divider_too_large() {
        let err = GaugeError::DividerTooLarge {
            size: 2000,
            range: 1000,
        };
        assert!(err.to_string().contains("2000"));
        assert!(err.to_string().contains("1000"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "layout missing");
        let err: GaugeError = io_err.into();
        assert!(err.to_string().contains("IO error"));
        assert!(err.to_string().contains("layout missing"));
    }
}
