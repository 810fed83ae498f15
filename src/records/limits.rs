//! Hard limits against adversarial input.
//!
//! Wire-supplied counts and lengths are never trusted up front: nesting is
//! depth-bounded, and array decoding pre-allocates at most
//! [`MAX_PREALLOC_ELEMENTS`] slots before growing against actual input.

/// Maximum nesting depth for structs and arrays during decode and skip.
/// Exceeding it fails with `CorruptedData`.
pub const MAX_NESTING_DEPTH: u32 = 16;

/// Upper bound on up-front `Vec` reservation while decoding an array. A
/// wire-declared element count larger than this grows incrementally and
/// runs out of input long before it runs out of memory.
pub const MAX_PREALLOC_ELEMENTS: usize = 1024;

/// Inline capacity of the per-struct field-entry scan; records with at most
/// this many fields are scanned without heap allocation.
pub(crate) const INLINE_FIELD_ENTRIES: usize = 16;
