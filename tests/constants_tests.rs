// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use viewfinder::constants::{PhotoQuality, storage};

#[test]
fn test_photo_quality_values() {
    assert_eq!(PhotoQuality::ALL.len(), 4);
    assert_eq!(PhotoQuality::default(), PhotoQuality::High);
}

#[test]
fn test_photo_quality_ordering() {
    // Presets are ordered from lowest to highest quality
    let mut prev = 0u8;
    for quality in PhotoQuality::ALL {
        let value = quality.jpeg_quality();
        assert!(value > prev, "{:?} should be above the previous preset", quality);
        assert!(value <= 100);
        prev = value;
    }
}

#[test]
fn test_photo_quality_display_names() {
    for quality in PhotoQuality::ALL {
        assert!(
            !quality.display_name().is_empty(),
            "Preset {:?} has empty display name",
            quality
        );
    }
}

#[test]
fn test_storage_constants() {
    assert_eq!(storage::MIME_TYPE, "image/jpeg");
    assert_eq!(storage::DEFAULT_ALBUM, "CameraApp");
    assert_eq!(storage::COLLECTION, "Pictures");
}
