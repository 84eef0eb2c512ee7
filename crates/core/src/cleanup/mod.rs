//! Cleanup passes over raw edit scripts
//!
//! The driver's recursion produces a correct but noisy script. These passes
//! rewrite it in place:
//!
//! - merge: coalesce runs of like operations, factor common affixes out of
//!   delete/insert pairs, and slide single edits to eliminate equalities.
//!   Establishes the canonical form every consumer relies on.
//! - semantic: sacrifice small equalities that fragment larger edits, slide
//!   edit boundaries to word/line boundaries, and surface overlaps between
//!   deletions and insertions.
//! - efficiency: sacrifice equalities that cost more to keep than the edits
//!   they separate, tunable via an edit-cost threshold.
//!
//! The semantic and efficiency walks mark doomed equalities with the
//! internal `DeleteInsert` tag and let a following merge pass materialize
//! them; the tag never survives into a final script.

mod efficiency;
mod merge;
mod semantic;
