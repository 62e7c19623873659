//! Setting value validation.

use image_engine::MAX_QR_SIZE;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "QR_SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "QR_MAX_UPLOAD_BYTES" => validate_int_range(value, 1024, 100 * 1024 * 1024)?,
        "QR_MAX_SIZE" => validate_int_range(value, 1, i64::from(MAX_QR_SIZE))?,
        "QR_WATERMARK_SCALE" => {
            let v: f64 = value.parse().map_err(|_| "must be a float")?;
            if !(0.01..=1.0).contains(&v) {
                return Err("must be between 0.01 and 1.0".into());
            }
        }
        "QR_CENTERING" => {
            if value != "centered" && value != "square" {
                return Err("must be 'centered' or 'square'".into());
            }
        }
        "QR_REQUEST_TIMEOUT_SECS" => validate_int_range(value, 1, 600)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_port() {
        assert!(validate_setting("QR_SERVER_PORT", "8083").is_ok());
        assert!(validate_setting("QR_SERVER_PORT", "0").is_err());
        assert!(validate_setting("QR_SERVER_PORT", "70000").is_err());
        assert!(validate_setting("QR_SERVER_PORT", "http").is_err());
    }

    #[test]
    fn test_valid_watermark_scale() {
        assert!(validate_setting("QR_WATERMARK_SCALE", "0.25").is_ok());
        assert!(validate_setting("QR_WATERMARK_SCALE", "1.0").is_ok());
        assert!(validate_setting("QR_WATERMARK_SCALE", "0").is_err());
        assert!(validate_setting("QR_WATERMARK_SCALE", "1.5").is_err());
        assert!(validate_setting("QR_WATERMARK_SCALE", "quarter").is_err());
    }

    #[test]
    fn test_valid_centering() {
        assert!(validate_setting("QR_CENTERING", "centered").is_ok());
        assert!(validate_setting("QR_CENTERING", "square").is_ok());
        assert!(validate_setting("QR_CENTERING", "middle").is_err());
    }

    #[test]
    fn test_max_size_bounded_by_engine_limit() {
        assert!(validate_setting("QR_MAX_SIZE", "8192").is_ok());
        assert!(validate_setting("QR_MAX_SIZE", "8193").is_err());
    }

    #[test]
    fn test_range_error_message() {
        assert_eq!(
            validate_setting("QR_REQUEST_TIMEOUT_SECS", "601"),
            Err("must be between 1 and 600".to_string())
        );
    }

    #[test]
    fn test_unknown_key_is_accepted() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
