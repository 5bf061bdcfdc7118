//! Collapses provider content parts into one display string.
//!
//! ```rust
//! use swengine::{NO_RESPONSE, normalize};
//! use swprovider::ContentPart;
//!
//! let parts = vec![ContentPart::text("first"), ContentPart::text("second")];
//! assert_eq!(normalize(&parts), "first\n\nsecond");
//! assert_eq!(normalize(&[]), NO_RESPONSE);
//! ```

use swprovider::ContentPart;

pub const NO_RESPONSE: &str = "No response from tool";

const PART_SEPARATOR: &str = "\n\n";

/// Text parts joined by a blank line; never empty.
pub fn normalize(parts: &[ContentPart]) -> String {
    let texts: Vec<&str> = parts.iter().filter_map(ContentPart::as_text).collect();

    if texts.is_empty() {
        return NO_RESPONSE.to_string();
    }
    texts.join(PART_SEPARATOR)
}
