use crate::models::post::Category;
use anyhow::{bail, Result};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
/// Ceiling on the encoded (base64) image payload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Validates post fields against the data model constraints.
/// Inputs are expected to be pre-trimmed; lengths count chars, not bytes.
pub fn validate_post(
    title: &str,
    description: &str,
    category: &str,
    image: Option<&str>,
) -> Result<()> {
    let title_chars = title.chars().count();
    if title_chars < TITLE_MIN_CHARS {
        bail!("Title must be at least {} characters long", TITLE_MIN_CHARS);
    }
    if title_chars > TITLE_MAX_CHARS {
        bail!("Title cannot exceed {} characters", TITLE_MAX_CHARS);
    }
    if description.chars().count() < DESCRIPTION_MIN_CHARS {
        bail!(
            "Description must be at least {} characters long",
            DESCRIPTION_MIN_CHARS
        );
    }
    if category.parse::<Category>().is_err() {
        bail!("'{}' is not a valid category", category);
    }
    if let Some(image) = image {
        if image.len() > MAX_IMAGE_BYTES {
            bail!("Image is too large. Please use a smaller image.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "This is a sufficiently long body.";

    #[test]
    fn test_valid_post_passes() {
        assert!(validate_post("Hello World", DESCRIPTION, "Technology", None).is_ok());
    }

    #[test]
    fn test_title_boundary() {
        // 2 chars rejected, 3 accepted
        assert!(validate_post("ab", DESCRIPTION, "General", None).is_err());
        assert!(validate_post("abc", DESCRIPTION, "General", None).is_ok());
    }

    #[test]
    fn test_title_upper_boundary() {
        let at_limit = "a".repeat(TITLE_MAX_CHARS);
        let over = "a".repeat(TITLE_MAX_CHARS + 1);
        assert!(validate_post(&at_limit, DESCRIPTION, "General", None).is_ok());
        assert!(validate_post(&over, DESCRIPTION, "General", None).is_err());
    }

    #[test]
    fn test_description_boundary() {
        // 9 chars rejected, 10 accepted
        assert!(validate_post("Title", "123456789", "General", None).is_err());
        assert!(validate_post("Title", "1234567890", "General", None).is_ok());
    }

    #[test]
    fn test_lengths_count_chars_not_bytes() {
        // Three multibyte chars meet the three-char title minimum.
        assert!(validate_post("åäö", DESCRIPTION, "General", None).is_ok());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = validate_post("Title", DESCRIPTION, "Gardening", None).unwrap_err();
        assert!(err.to_string().contains("Gardening"));
    }

    #[test]
    fn test_image_ceiling() {
        let at_limit = "a".repeat(MAX_IMAGE_BYTES);
        let over = "a".repeat(MAX_IMAGE_BYTES + 1);
        assert!(validate_post("Title", DESCRIPTION, "General", Some(&at_limit)).is_ok());
        assert!(validate_post("Title", DESCRIPTION, "General", Some(&over)).is_err());
    }
}
