// SPDX-License-Identifier: MPL-2.0

//! Media utilities for encoding
//!
//! The [`encoders`] module talks to the ffmpeg executable:
//! - **Detection**: locating the binary and querying its encoders and muxers
//! - **Video**: known encoder table, priority selection and quality presets

pub mod encoders;
