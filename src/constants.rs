// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application name used in share subjects and directory names
pub const APP_NAME: &str = "QR Scanner";

/// Viewfinder overlay drawing constants
pub mod viewfinder {
    use super::Duration;

    /// Alpha used for the result image and the current point markers
    pub const CURRENT_POINT_OPACITY: u8 = 0xA0;

    /// Upper bound on the possible result point trail
    pub const MAX_RESULT_POINTS: usize = 20;

    /// Radius of a current point marker, also the invalidation margin
    pub const POINT_SIZE: i32 = 6;

    /// Horizontal inset of the scan line inside the frame
    pub const SLIDER_PADDING: i32 = 5;

    /// One sweep of the scan line (top to bottom or back)
    pub const SLIDER_ANIM_DURATION: Duration = Duration::from_millis(3000);

    /// Interval between scan line animation ticks (~60fps)
    pub const SLIDER_TICK_INTERVAL: Duration = Duration::from_millis(16);

    /// Stroke width of the frame border
    pub const FRAME_STROKE_WIDTH: f32 = 2.0;

    /// Width of the generated scan line image before scaling
    pub const SLIDER_IMAGE_WIDTH: u32 = 256;
}

/// Framing rectangle limits, in display pixels
pub mod framing {
    pub const MIN_FRAME_WIDTH: i32 = 240;
    pub const MIN_FRAME_HEIGHT: i32 = 240;
    pub const MAX_FRAME_WIDTH: i32 = 1200;
    pub const MAX_FRAME_HEIGHT: i32 = 675;

    /// Terminal canvases are tiny compared to a phone display
    pub const TERMINAL_MIN_FRAME: i32 = 16;
    pub const TERMINAL_MAX_FRAME_WIDTH: i32 = 120;
    pub const TERMINAL_MAX_FRAME_HEIGHT: i32 = 80;
}

/// Barcode generation and storage constants
pub mod barcode {
    /// Barcode file names are truncated to this many characters
    pub const MAX_BARCODE_FILENAME_LENGTH: usize = 24;

    /// Directory layout under the pictures directory
    pub const SCANNER_DIR: &str = "BarcodeScanner";
    pub const BARCODES_DIR: &str = "Barcodes";

    /// Modules of white border around the symbol
    pub const QUIET_ZONE_MODULES: usize = 4;

    /// Smallest barcode side in density-independent pixels
    pub const MIN_BARCODE_DIP: f32 = 120.0;

    /// Watermark width as a fraction of the barcode width
    pub const WATERMARK_FRACTION: u32 = 5;

    pub const SHARE_MIME_TYPE: &str = "image/png";
}

/// QR detection constants
pub mod detection {
    /// Frames are downscaled so the longest side is at most this
    pub const MAX_DETECTION_DIMENSION: u32 = 640;
}

/// Supported input file formats for the image frame source
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Frame source timing constants
pub mod frame_source {
    use super::Duration;

    /// Frame rate for image streaming (~30fps)
    pub const IMAGE_STREAM_FRAME_DURATION: Duration = Duration::from_millis(33);

    /// How long each image is shown before moving to the next one
    pub const DEFAULT_HOLD: Duration = Duration::from_millis(4000);

    /// Frames buffered between the source thread and the UI
    pub const CHANNEL_CAPACITY: usize = 4;
}

/// Terminal UI timing
pub mod terminal {
    use super::Duration;

    /// Input poll timeout, also the redraw cadence when idle
    pub const INPUT_POLL: Duration = Duration::from_millis(16);
}
