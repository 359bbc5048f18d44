//! Output generation for post files and the manifest.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders one Markdown post per news item, never overwriting
//! - [`json`]: Rewrites the full manifest as indented JSON
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news.json                          # Manifest, newest first
//! └── posts/
//!     ├── 202401051234-release-v2.md
//!     └── 202401031010-maintenance-tonight.md
//! ```

pub mod json;
pub mod markdown;
