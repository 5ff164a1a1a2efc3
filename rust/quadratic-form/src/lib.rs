//! Experiments on the form f(m,n) = 4 + 3m + 3n + 2mn.
//!
//! The values of f are exactly the indices x with 2x + 1 an odd composite,
//! so the image of f is the zero set of the odd-prime indicator. This crate
//! counts values and collisions over a grid, tabulates residues, checks that
//! every odd composite is covered, and compares preimage multiplicities with
//! the divisor count.
//!
//! - [`form`]: f, grid counts, summaries, image membership
//! - [`stats`]: residue histograms and divisibility counts
//! - [`coverage`]: odd-composite coverage and image vs indicator
//! - [`multiplicity`]: preimage counts against d(c) - 2
//! - [`checkpoint`]: row-by-row collision table with resume

pub mod checkpoint;
pub mod coverage;
pub mod error;
pub mod form;
pub mod multiplicity;
pub mod stats;

pub use checkpoint::{CollisionGenerator, CollisionState, EntryKind};
pub use coverage::{coverage_scan, covers_by_form, image_disagreements, CoverageReport};
pub use error::{FormError, Result};
pub use form::{f, generate_counts, in_image, odd_value, summarize, Counts, Summary};
pub use multiplicity::{
    expected_ordered, expected_unordered, odd_divisor_count, ordered_preimage_count,
    ordered_preimages, sample_odd_composites, unordered_preimage_count, verify_multiplicity,
    CountMismatch, MultiplicityReport,
};
pub use stats::{divisibility_counts, mod3_distribution, residue_distribution, DivisibilityCount};
