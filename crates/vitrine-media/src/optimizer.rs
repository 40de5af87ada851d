//! Optimized Source Derivation
//!
//! Deterministic string transforms from a raw image source to its
//! quality-negotiated delivery URL. The query parameter set is a
//! compatibility contract with the image CDN; same inputs must always
//! produce the same output.

use vitrine_platform::ConnectionClass;

/// Responsive sizes hint matching the three srcset tiers
pub const RESPONSIVE_SIZES: &str = "(max-width: 600px) 300px, (max-width: 1200px) 600px, 1200px";

/// Derive the optimized delivery URL for a deferred image.
///
/// Existing query parameters are stripped. Quality is picked by a two-tier
/// table: very low for sub-3g connections, low otherwise, keeping images
/// under the 150KB size hint.
pub fn optimized_src(src: &str, connection: ConnectionClass, webp: bool) -> String {
    let quality = if connection.speed_rank() < 3 { "3" } else { "15" };
    let base = base_url(src);

    if webp {
        format!(
            "{}?format=webp&quality={}&width=800&compress=high&max_size=150&strip=all&optimize=medium",
            base, quality
        )
    } else {
        format!(
            "{}?quality={}&width=800&compress=high&max_size=150&strip=all&optimize=medium",
            base, quality
        )
    }
}

/// Build the three-tier responsive srcset for an already-loaded image
pub fn responsive_srcset(src: &str, webp: bool) -> String {
    let base = base_url(src);

    if webp {
        format!(
            "{0}?format=webp&quality=20 300w, {0}?format=webp&quality=30 600w, {0}?format=webp&quality=40 1200w",
            base
        )
    } else {
        format!(
            "{0}?quality=20 300w, {0}?quality=30 600w, {0}?quality=40 1200w",
            base
        )
    }
}

fn base_url(src: &str) -> &str {
    src.split('?').next().unwrap_or(src)
}
