// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines that run outside the screen loops
//!
//! - [`barcode`]: QR code rendering, saving and sharing

pub mod barcode;
