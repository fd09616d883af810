use thiserror::Error;

/// The generic Error type, covering every failure this library can report.
///
/// Address values are pure: once one is constructed, equality, ordering,
/// hashing, and rendering can no longer fail. Errors therefore arise in
/// exactly two places: validating producer input at construction time, and
/// serializing a result document at the report boundary.
///
/// # Examples
///
/// ```rust
/// use findscope::{address::Address, Error};
///
/// match Address::file_offset(-1) {
///     Err(Error::OutOfRange { kind, field, value }) => {
///         eprintln!("bad {} for {} address: {}", field, kind, value);
///     }
///     other => panic!("expected a validation failure, got {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A field of an address violated its range invariant at construction.
    ///
    /// Raised when a producer hands over a negative value for a
    /// non-negative-constrained field (offsets, ids, trace event numbers), a
    /// non-positive pid, or an id that does not fit the 32-bit id space.
    /// Fatal to that construction attempt; never produced by any later
    /// operation on an existing address.
    ///
    /// # Fields
    ///
    /// * `kind`  - The address kind being constructed, e.g. `"process"`
    /// * `field` - The offending field, e.g. `"pid"`
    /// * `value` - The rejected input value
    #[error("{field} out of range for {kind} address: {value}")]
    OutOfRange {
        /// The address kind being constructed
        kind: &'static str,
        /// The field that violated its invariant
        field: &'static str,
        /// The rejected input value
        value: i64,
    },

    /// Serializing a result document failed.
    ///
    /// Wraps the underlying `serde_json` error. Does not occur for
    /// well-formed documents; it exists so the report boundary can propagate
    /// instead of panicking.
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}
