//! `diffcore` computes diffs: three line-diff algorithms (Myers, Patience,
//! Histogram) that feed a shared operation-merge and hunking pipeline, a
//! word/char-level refinement pass, block-level move detection, a
//! structural (JSON tree) differ, and a bidirectional unified-diff codec.
//!
//! # Computing a line diff
//!
//! ```
//! use diffcore::{diff, DiffOptions};
//!
//! let result = diff("a\nb\nc", "a\nx\nc", DiffOptions::default());
//! assert_eq!(result.hunks[0].header, "@@ -1,3 +1,3 @@");
//! assert_eq!(result.stats.additions, 1);
//! ```
//!
//! # Refining a change into word segments
//!
//! ```
//! use diffcore::word_diff::{word_diff, Granularity};
//! use diffcore::ComparatorOptions;
//!
//! let result = word_diff("the quick fox", "the slow fox", Granularity::Word, &ComparatorOptions::default());
//! assert!(result.has_differences);
//! ```
//!
//! # Comparing JSON trees
//!
//! ```
//! use diffcore::semantic::{diff_tree, SemanticDiffOptions};
//! use serde_json::json;
//!
//! let (changes, stats) = diff_tree(
//!     &json!({"user": {"name": "Alice"}}),
//!     &json!({"user": {"name": "Bob"}}),
//!     &SemanticDiffOptions::default(),
//! );
//! assert!(!stats.is_equal());
//! assert_eq!(changes.len(), 1);
//! ```

mod diff;
pub mod error;
mod histogram;
pub mod hunk;
mod intern;
pub mod line;
pub mod line_pair;
pub mod moves;
mod myers;
pub mod operation;
pub mod options;
mod patience;
pub mod semantic;
pub mod similarity;
mod util;
pub mod unified;
pub mod word_diff;

pub use crate::diff::diff;
pub use crate::error::{DiffError, Result};
pub use crate::hunk::{generate_hunks, Change, Hunk};
pub use crate::intern::{InternedInput, Interner, Token};
pub use crate::line::{split_lines, ComparatorOptions, Line, LineRecord};
pub use crate::operation::{merge, OpKind, Operation};
pub use crate::options::{Algorithm, DiffOptions, DiffResult, Granularity, Stats, WordRefinement};
