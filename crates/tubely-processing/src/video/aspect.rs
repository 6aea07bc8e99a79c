//! Aspect-ratio labelling and classification.

use crate::traits::VideoDimensions;
use tubely_core::AspectClass;

pub const LANDSCAPE_LABEL: &str = "16:9";
pub const PORTRAIT_LABEL: &str = "9:16";
pub const OTHER_LABEL: &str = "other";

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;

/// Label a frame as "16:9", "9:16" or "other".
///
/// A ratio matches when it lies within `tolerance` of the reference.
pub fn aspect_ratio_label(dimensions: VideoDimensions, tolerance: f64) -> &'static str {
    let ratio = dimensions.aspect_ratio();
    if (ratio - LANDSCAPE_RATIO).abs() <= tolerance {
        LANDSCAPE_LABEL
    } else if (ratio - PORTRAIT_RATIO).abs() <= tolerance {
        PORTRAIT_LABEL
    } else {
        OTHER_LABEL
    }
}

pub fn classify(label: &str) -> AspectClass {
    match label {
        LANDSCAPE_LABEL => AspectClass::Landscape,
        PORTRAIT_LABEL => AspectClass::Portrait,
        _ => AspectClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::constants::DEFAULT_ASPECT_RATIO_TOLERANCE;

    fn label(width: u32, height: u32) -> &'static str {
        aspect_ratio_label(
            VideoDimensions::new(width, height),
            DEFAULT_ASPECT_RATIO_TOLERANCE,
        )
    }

    #[test]
    fn test_common_landscape_resolutions() {
        assert_eq!(label(1920, 1080), "16:9");
        assert_eq!(label(1280, 720), "16:9");
        assert_eq!(label(3840, 2160), "16:9");
        // 854x480 is 1.7792, inside the band
        assert_eq!(label(854, 480), "16:9");
    }

    #[test]
    fn test_common_portrait_resolutions() {
        assert_eq!(label(1080, 1920), "9:16");
        assert_eq!(label(720, 1280), "9:16");
        assert_eq!(label(608, 1080), "9:16");
    }

    #[test]
    fn test_everything_else_is_other() {
        assert_eq!(label(1080, 1080), "other");
        assert_eq!(label(640, 480), "other");
        assert_eq!(label(2560, 1080), "other");
        assert_eq!(label(1080, 1350), "other");
    }

    #[test]
    fn test_tolerance_boundary() {
        // 1.79 is 0.0122 from 16/9
        assert_eq!(label(179, 100), "other");
        // 1.785 is 0.0072 from 16/9
        assert_eq!(label(357, 200), "16:9");
        assert_eq!(
            aspect_ratio_label(VideoDimensions::new(179, 100), 0.02),
            "16:9"
        );
    }

    #[test]
    fn test_classify_maps_labels() {
        assert_eq!(classify("16:9"), AspectClass::Landscape);
        assert_eq!(classify("9:16"), AspectClass::Portrait);
        assert_eq!(classify("other"), AspectClass::Other);
        assert_eq!(classify("4:3"), AspectClass::Other);
    }
}
