// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use viewfinder::Config;
use viewfinder::PhotoQuality;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.album, "CameraApp", "Photos go to CameraApp by default");
    assert_eq!(config.photo_quality, PhotoQuality::High);
    assert!(config.camera_path.is_none(), "Default camera is auto-detected");
}

#[test]
fn test_blank_album_falls_back_to_default() {
    let config = Config {
        album: "   ".to_string(),
        ..Config::default()
    };
    assert_eq!(config.album_name(), "CameraApp");
}

#[test]
fn test_album_name_is_trimmed() {
    let config = Config {
        album: " Holidays ".to_string(),
        ..Config::default()
    };
    assert_eq!(config.album_name(), "Holidays");
}
