//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("QR_SERVER_PORT", "8083", "TCP port the HTTP server listens on"),
    (
        "QR_MAX_UPLOAD_BYTES",
        "10485760",
        "Maximum request body size, including the watermark upload",
    ),
    ("QR_MAX_SIZE", "4096", "Largest accepted QR code size in pixels"),
    (
        "QR_WATERMARK_SCALE",
        "0.25",
        "Watermark width as a fraction of the QR code width",
    ),
    (
        "QR_CENTERING",
        "centered",
        "Watermark centering: 'centered' or 'square' (half-width on both axes)",
    ),
    (
        "QR_REQUEST_TIMEOUT_SECS",
        "30",
        "Deadline for a single generation, in seconds",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});
