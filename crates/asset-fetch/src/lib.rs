//! Shortsmith Asset Fetching
//!
//! Pre-render acquisition of overlay images:
//! - **Article:** extract image URLs from an article text artifact
//! - **Download:** fetch each image into a job-scoped temporary directory
//!
//! All downloads happen before compositing begins, so the frame compositor
//! stays fully offline.

pub mod article;
pub mod download;

pub use article::extract_image_urls;
pub use download::{download_images, ImageSet};
