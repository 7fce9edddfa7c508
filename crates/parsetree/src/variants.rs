//! Closed variant sets.
//!
//! Each desc enum lists its variants by name. `variant_name` is an
//! exhaustive match with no fallback arm, so adding a variant without
//! updating the list and every consumer fails to compile or fails the
//! golden-list tests.

/// A closed enumeration of syntactic shapes.
pub trait VariantSet {
    /// Every variant name, in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Name of the variant this value is.
    fn variant_name(&self) -> &'static str;
}
