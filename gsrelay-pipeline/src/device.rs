//! Ghostscript device name to output extension mapping.

/// Output file extension for a supported Ghostscript device, `None` for
/// anything outside the supported set.
pub fn device_extension(device: &str) -> Option<&'static str> {
    match device {
        "pxlmono" | "pxlcolor" | "pcl3" | "pclm" | "pclm8" => Some("pcl"),
        "png16m" | "png16" | "png48" | "pngalpha" | "pnggray" | "pngmono" => Some("png"),
        "jpeg" | "jpeggray" | "jpegcmyk" => Some("jpg"),
        _ => None,
    }
}
