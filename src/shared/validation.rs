//! Validation Utilities

use validator::ValidationErrors;

use super::error::AppError;

/// Convert request validation failures into an `AppError`.
///
/// Every failed field is reported, sorted by field name so the message
/// is deterministic regardless of map iteration order.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, detail)
            })
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        AppError::Validation("Validation failed".into())
    } else {
        AppError::Validation(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, max = 5, message = "must be 1-5 characters"))]
        name: String,
        #[validate(range(min = 1, message = "must be positive"))]
        count: i64,
    }

    #[test]
    fn reports_every_failed_field() {
        let form = Form {
            name: String::new(),
            count: 0,
        };
        let err = validation_error(form.validate().unwrap_err());

        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("name: must be 1-5 characters"));
                assert!(msg.contains("count: must be positive"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_input_produces_no_error() {
        let form = Form {
            name: "ok".into(),
            count: 3,
        };
        assert!(form.validate().is_ok());
    }
}
