// SPDX-License-Identifier: GPL-3.0-only

//! Barcode generation and sharing
//!
//! ```text
//! EncodeRequest ──▶ QrCodeEncoder ──▶ PNG in the barcode directory ──▶ mailto:
//!                   (qrcode + watermark)     (storage)                 (open)
//! ```

pub mod encoder;
pub mod share;

pub use encoder::{QrCodeEncoder, barcode_dimension};
pub use share::{ShareRequest, prepare_share, send};
