//! Location addressing for capability findings.
//!
//! Every finding produced by an analysis backend is tagged with an [`Address`]
//! describing where it was observed. The family is closed: static backends
//! produce file offsets, relative and absolute virtual addresses, .NET
//! backends produce metadata-token locations, and dynamic-trace backends
//! produce process/thread/call-event coordinates. All variants share one
//! capability set (equality, strict total ordering, hashing, and rendering),
//! so the matching engine can use any mix of them as map keys, set members,
//! and sort keys without caring which backend produced them.
//!
//! # Key Types
//! - [`Address`] - The closed location family
//! - [`AddressKind`] - Fieldless discriminant for diagnostics and iteration
//! - [`Token`] - Raw .NET metadata token
//! - [`NO_ADDRESS`] - Sentinel for findings with no specific location
//!
//! # Example
//! ```rust
//! use findscope::address::{Address, NO_ADDRESS};
//!
//! let a = Address::absolute(0x401000)?;
//! let b = Address::file_offset(0x200)?;
//! assert!(a < b); // fixed variant priority: absolute before file offset
//! assert!(NO_ADDRESS.matches(&a));
//! # Ok::<(), findscope::Error>(())
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::{Error, Result};

/// The single canonical "no specific location" sentinel.
///
/// Producers attach it to findings that hold for the whole sample rather than
/// for one spot, for example a characteristic derived from the file header.
/// It never sorts before any located address (it is the maximum of the total
/// order) and [`Address::matches`] treats it as matching every location.
pub const NO_ADDRESS: Address = Address::NoAddress;

/// A location inside a binary or a dynamic execution trace.
///
/// The variant order is load-bearing: heterogeneous comparisons fall back to
/// this fixed variant priority before any field is looked at, which keeps
/// `Ord` total across the whole family. [`Address::NoAddress`] is declared
/// last so the sentinel never sorts before a located address.
///
/// Equality is strict: two addresses are equal only when they are the same
/// variant with the same fields. The looser "does this finding apply here"
/// relation, where the sentinel absorbs everything, is [`Address::matches`].
///
/// The serialized form is type-tagged and lossless
/// (`{"type": "absolute", "value": 4198400}`), so structured consumers can
/// reconstruct the exact variant without parsing display text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Address {
    /// An absolute virtual memory address.
    Absolute(u64),
    /// A virtual address relative to an implicit load base.
    Relative(u64),
    /// A byte offset into the file image.
    FileOffset(u64),
    /// A process in a dynamic execution trace.
    Process(ProcessAddress),
    /// A thread within a traced process.
    Thread(ThreadAddress),
    /// A call event in a dynamic execution trace.
    Dynamic(DynamicAddress),
    /// A .NET metadata token.
    Token(Token),
    /// A byte offset within the entity named by a .NET metadata token.
    TokenOffset(TokenOffsetAddress),
    /// No specific location. Always the maximum of the total order.
    NoAddress,
}

impl Address {
    /// Creates an absolute virtual address.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `value` is negative.
    pub fn absolute(value: i64) -> Result<Self> {
        Ok(Address::Absolute(non_negative(
            AddressKind::Absolute,
            "value",
            value,
        )?))
    }

    /// Creates a virtual address relative to the load base.
    #[must_use]
    pub fn relative(value: u64) -> Self {
        Address::Relative(value)
    }

    /// Creates a file offset address.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `value` is negative.
    pub fn file_offset(value: i64) -> Result<Self> {
        Ok(Address::FileOffset(non_negative(
            AddressKind::FileOffset,
            "value",
            value,
        )?))
    }

    /// Returns the fieldless discriminant of this address.
    #[must_use]
    pub fn kind(&self) -> AddressKind {
        match self {
            Address::Absolute(_) => AddressKind::Absolute,
            Address::Relative(_) => AddressKind::Relative,
            Address::FileOffset(_) => AddressKind::FileOffset,
            Address::Process(_) => AddressKind::Process,
            Address::Thread(_) => AddressKind::Thread,
            Address::Dynamic(_) => AddressKind::Dynamic,
            Address::Token(_) => AddressKind::Token,
            Address::TokenOffset(_) => AddressKind::TokenOffset,
            Address::NoAddress => AddressKind::NoAddress,
        }
    }

    /// Returns true if this address refers to the same location as `other`,
    /// treating [`NO_ADDRESS`] as matching any location.
    ///
    /// This is the relation the matching engine uses to decide whether a
    /// finding applies at a given spot. It is symmetric: the sentinel absorbs
    /// from either side. Strict `==` never equates the sentinel with a
    /// located address.
    #[must_use]
    pub fn matches(&self, other: &Address) -> bool {
        matches!(self, Address::NoAddress) || matches!(other, Address::NoAddress) || self == other
    }
}

// The same fields that participate in equality, in the same order. The
// sentinel hashes the constant 0 so it lands in a single, stable bucket.
impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Address::Absolute(value) => {
                state.write_u8(0);
                value.hash(state);
            }
            Address::Relative(value) => {
                state.write_u8(1);
                value.hash(state);
            }
            Address::FileOffset(value) => {
                state.write_u8(2);
                value.hash(state);
            }
            Address::Process(process) => {
                state.write_u8(3);
                process.hash(state);
            }
            Address::Thread(thread) => {
                state.write_u8(4);
                thread.hash(state);
            }
            Address::Dynamic(dynamic) => {
                state.write_u8(5);
                dynamic.hash(state);
            }
            Address::Token(token) => {
                state.write_u8(6);
                token.hash(state);
            }
            Address::TokenOffset(token_offset) => {
                state.write_u8(7);
                token_offset.hash(state);
            }
            Address::NoAddress => 0u64.hash(state),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Absolute(value) => write!(f, "absolute(0x{value:x})"),
            Address::Relative(value) => write!(f, "relative(0x{value:x})"),
            Address::FileOffset(value) => write!(f, "file(0x{value:x})"),
            Address::Process(process) => write!(f, "{process}"),
            Address::Thread(thread) => write!(f, "{thread}"),
            Address::Dynamic(dynamic) => write!(f, "{dynamic}"),
            Address::Token(token) => write!(f, "token({token})"),
            Address::TokenOffset(token_offset) => write!(f, "{token_offset}"),
            Address::NoAddress => write!(f, "no address"),
        }
    }
}

impl From<ProcessAddress> for Address {
    fn from(process: ProcessAddress) -> Self {
        Address::Process(process)
    }
}

impl From<ThreadAddress> for Address {
    fn from(thread: ThreadAddress) -> Self {
        Address::Thread(thread)
    }
}

impl From<DynamicAddress> for Address {
    fn from(dynamic: DynamicAddress) -> Self {
        Address::Dynamic(dynamic)
    }
}

impl From<Token> for Address {
    fn from(token: Token) -> Self {
        Address::Token(token)
    }
}

impl From<TokenOffsetAddress> for Address {
    fn from(token_offset: TokenOffsetAddress) -> Self {
        Address::TokenOffset(token_offset)
    }
}

/// Fieldless discriminant of the [`Address`] family.
///
/// The declaration order mirrors [`Address`] and therefore the variant
/// priority of the total order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum AddressKind {
    /// Discriminant of [`Address::Absolute`]
    Absolute,
    /// Discriminant of [`Address::Relative`]
    Relative,
    /// Discriminant of [`Address::FileOffset`]
    FileOffset,
    /// Discriminant of [`Address::Process`]
    Process,
    /// Discriminant of [`Address::Thread`]
    Thread,
    /// Discriminant of [`Address::Dynamic`]
    Dynamic,
    /// Discriminant of [`Address::Token`]
    Token,
    /// Discriminant of [`Address::TokenOffset`]
    TokenOffset,
    /// Discriminant of [`Address::NoAddress`]
    NoAddress,
}

impl AddressKind {
    /// Returns the snake_case name of this kind, as used in the serialized
    /// type tag and in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A process observed in a dynamic execution trace.
///
/// Ordered and hashed by `(ppid, pid)`: the parent groups first, then the
/// process itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessAddress {
    ppid: u32,
    pid: u32,
}

impl ProcessAddress {
    /// Creates a process address.
    ///
    /// # Arguments
    /// * `pid`  - The process id, must be positive
    /// * `ppid` - The parent process id, zero when unknown
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `pid` is not positive, or if either
    /// id is negative or exceeds the 32-bit id space.
    pub fn new(pid: i64, ppid: i64) -> Result<Self> {
        if pid <= 0 {
            return Err(Error::OutOfRange {
                kind: AddressKind::Process.name(),
                field: "pid",
                value: pid,
            });
        }
        Ok(ProcessAddress {
            ppid: id32(AddressKind::Process, "ppid", ppid)?,
            pid: id32(AddressKind::Process, "pid", pid)?,
        })
    }

    /// The process id.
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The parent process id, zero when unknown.
    #[must_use]
    pub fn ppid(&self) -> u32 {
        self.ppid
    }
}

impl fmt::Display for ProcessAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ppid > 0 {
            write!(f, "process(ppid: {}, pid: {})", self.ppid, self.pid)
        } else {
            write!(f, "process(pid: {})", self.pid)
        }
    }
}

/// A thread within a traced process.
///
/// Holds a shared reference to its owning [`ProcessAddress`] rather than a
/// copy; every thread of one process points at the same value. Ordered and
/// hashed by `(process, tid)`, so threads group under their process in any
/// sorted view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThreadAddress {
    process: Arc<ProcessAddress>,
    tid: u32,
}

impl ThreadAddress {
    /// Creates a thread address under `process`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `tid` is negative or exceeds the
    /// 32-bit id space.
    pub fn new(process: Arc<ProcessAddress>, tid: i64) -> Result<Self> {
        Ok(ThreadAddress {
            tid: id32(AddressKind::Thread, "tid", tid)?,
            process,
        })
    }

    /// The owning process.
    #[must_use]
    pub fn process(&self) -> &ProcessAddress {
        &self.process
    }

    /// The thread id.
    #[must_use]
    pub fn tid(&self) -> u32 {
        self.tid
    }
}

impl fmt::Display for ThreadAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread(tid: {})", self.tid)
    }
}

/// A call event in a dynamic execution trace.
///
/// Identified by the monotonic trace event id and the return site of the
/// call, ordered and hashed by `(id, return_address)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DynamicAddress {
    id: u64,
    return_address: u64,
}

impl DynamicAddress {
    /// Creates a dynamic call-event address.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `id` or `return_address` is negative.
    pub fn new(id: i64, return_address: i64) -> Result<Self> {
        Ok(DynamicAddress {
            id: non_negative(AddressKind::Dynamic, "id", id)?,
            return_address: non_negative(AddressKind::Dynamic, "return_address", return_address)?,
        })
    }

    /// The trace event id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The return address of the call.
    #[must_use]
    pub fn return_address(&self) -> u64 {
        self.return_address
    }
}

impl fmt::Display for DynamicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dynamic(event: {}, returnaddress: 0x{:x})",
            self.id, self.return_address
        )
    }
}

/// A raw .NET metadata token.
///
/// The 32-bit value carries the table type in its high byte and the row index
/// in the low 24 bits. No range check is applied; producers hand over whatever
/// the metadata stream contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(u32);

impl Token {
    /// Creates a token from its raw 32-bit value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// The raw token value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// The metadata table type (high byte).
    #[must_use]
    pub fn table(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The row index within the table (low 24 bits).
    #[must_use]
    pub fn row(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true for the null token.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// A byte offset within the entity named by a .NET metadata token, for
/// example a spot inside a method body.
///
/// Ordered and hashed by `(token, offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenOffsetAddress {
    token: Token,
    offset: u64,
}

impl TokenOffsetAddress {
    /// Creates a token-relative offset address.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `offset` is negative.
    pub fn new(token: Token, offset: i64) -> Result<Self> {
        Ok(TokenOffsetAddress {
            token,
            offset: non_negative(AddressKind::TokenOffset, "offset", offset)?,
        })
    }

    /// The base token.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// The byte offset from the entity named by the token.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// A single numeric key for consumers that index findings by one integer:
    /// the token value plus the offset.
    #[must_use]
    pub fn index(&self) -> u64 {
        u64::from(self.token.value()) + self.offset
    }
}

impl fmt::Display for TokenOffsetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token({})+(0x{:x})", self.token, self.offset)
    }
}

fn non_negative(kind: AddressKind, field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::OutOfRange {
        kind: kind.name(),
        field,
        value,
    })
}

fn id32(kind: AddressKind, field: &'static str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::OutOfRange {
        kind: kind.name(),
        field,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use strum::IntoEnumIterator;

    fn process(pid: i64, ppid: i64) -> ProcessAddress {
        ProcessAddress::new(pid, ppid).unwrap()
    }

    #[test]
    fn test_absolute_construction() {
        assert_eq!(Address::absolute(0x1000).unwrap(), Address::Absolute(0x1000));
        assert_eq!(Address::absolute(0).unwrap(), Address::Absolute(0));
        assert!(matches!(
            Address::absolute(-1),
            Err(Error::OutOfRange { kind: "absolute", field: "value", value: -1 })
        ));
    }

    #[test]
    fn test_file_offset_construction() {
        assert!(Address::file_offset(0).is_ok());
        assert!(matches!(
            Address::file_offset(-1),
            Err(Error::OutOfRange { kind: "file_offset", .. })
        ));
    }

    #[test]
    fn test_process_construction() {
        let p = process(31337, 1000);
        assert_eq!(p.pid(), 31337);
        assert_eq!(p.ppid(), 1000);

        assert!(ProcessAddress::new(1, 0).is_ok());
        assert!(matches!(
            ProcessAddress::new(0, 0),
            Err(Error::OutOfRange { field: "pid", .. })
        ));
        assert!(matches!(
            ProcessAddress::new(-5, 0),
            Err(Error::OutOfRange { field: "pid", .. })
        ));
        assert!(matches!(
            ProcessAddress::new(5, -1),
            Err(Error::OutOfRange { field: "ppid", .. })
        ));
    }

    #[test]
    fn test_thread_construction() {
        let p = Arc::new(process(42, 0));
        let t = ThreadAddress::new(p.clone(), 7).unwrap();
        assert_eq!(t.tid(), 7);
        assert_eq!(t.process().pid(), 42);
        assert!(ThreadAddress::new(p.clone(), 0).is_ok());
        assert!(ThreadAddress::new(p, -1).is_err());
    }

    #[test]
    fn test_dynamic_construction() {
        let d = DynamicAddress::new(12, 0x77).unwrap();
        assert_eq!(d.id(), 12);
        assert_eq!(d.return_address(), 0x77);
        assert!(DynamicAddress::new(-1, 0).is_err());
        assert!(DynamicAddress::new(0, -1).is_err());
    }

    #[test]
    fn test_token_offset_construction() {
        let a = TokenOffsetAddress::new(Token::new(0x0600_0001), 0x10).unwrap();
        assert_eq!(a.token().value(), 0x0600_0001);
        assert_eq!(a.offset(), 0x10);
        assert!(TokenOffsetAddress::new(Token::new(0), -1).is_err());
    }

    #[test]
    fn test_token_decomposition() {
        let token = Token::new(0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert!(!token.is_null());
        assert!(Token::new(0).is_null());

        // no range check: any 32-bit pattern is a token
        let odd = Token::new(0xFF00_0000);
        assert_eq!(odd.table(), 0xFF);
        assert_eq!(odd.row(), 0);
    }

    #[test]
    fn test_token_offset_index() {
        let a = TokenOffsetAddress::new(Token::new(0x0600_0001), 0x10).unwrap();
        assert_eq!(a.index(), 0x0600_0011);
    }

    #[test]
    fn test_absolute_numeric_ordering() {
        let mut values = vec![
            Address::Absolute(0x10),
            Address::Absolute(0x2),
            Address::Absolute(0x100),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Address::Absolute(0x2),
                Address::Absolute(0x10),
                Address::Absolute(0x100),
            ]
        );
    }

    #[test]
    fn test_process_ordering_ppid_first() {
        assert!(process(5, 0) < process(5, 1));
        // ppid dominates pid entirely
        assert!(process(2, 0) < process(1, 9));
        assert!(!(process(1, 9) < process(2, 0)));
    }

    #[test]
    fn test_thread_ordering_nests_under_process() {
        let p1 = Arc::new(process(100, 0));
        let p2 = Arc::new(process(200, 0));
        let t1 = ThreadAddress::new(p1, 9).unwrap();
        let t2 = ThreadAddress::new(p2, 1).unwrap();
        // same-tid threads of different processes order by process first
        assert!(t1 < t2);

        let p3 = Arc::new(process(100, 0));
        let t3 = ThreadAddress::new(p3, 10).unwrap();
        assert!(t1 < t3);
    }

    #[test]
    fn test_dynamic_ordering_event_first() {
        let early = DynamicAddress::new(1, 0xFFFF).unwrap();
        let late = DynamicAddress::new(2, 0x1).unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_cross_variant_ordering_is_declaration_order() {
        let mixed = vec![
            Address::Absolute(0xFFFF_FFFF),
            Address::Relative(0),
            Address::FileOffset(0),
            Address::from(process(1, 0)),
            Address::from(DynamicAddress::new(0, 0).unwrap()),
            Address::from(Token::new(0xFFFF_FFFF)),
            Address::NoAddress,
        ];
        let mut sorted = mixed.clone();
        sorted.sort();
        assert_eq!(sorted, mixed);
    }

    #[test]
    fn test_no_address_is_maximal() {
        for kind in AddressKind::iter() {
            let addr = sample(kind);
            assert!(!(NO_ADDRESS < addr), "sentinel sorted before {addr}");
        }
        assert!(Address::Absolute(u64::MAX) < NO_ADDRESS);
    }

    #[test]
    fn test_matches_is_absorbing_both_ways() {
        let abs = Address::absolute(0x1000).unwrap();
        assert!(NO_ADDRESS.matches(&abs));
        assert!(abs.matches(&NO_ADDRESS));
        // strict equality stays strict in both directions
        assert!(abs != NO_ADDRESS);
        assert!(NO_ADDRESS != abs);
        assert_eq!(NO_ADDRESS, NO_ADDRESS);
    }

    #[test]
    fn test_matches_same_variant() {
        let a = Address::file_offset(0x200).unwrap();
        let b = Address::file_offset(0x200).unwrap();
        let c = Address::file_offset(0x300).unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
        // cross-variant comparison is false, never a panic
        assert!(!a.matches(&Address::Absolute(0x200)));
    }

    #[test]
    fn test_equality_is_field_wise() {
        assert_eq!(process(5, 1), process(5, 1));
        assert_ne!(process(5, 1), process(5, 2));
        assert_ne!(Address::Absolute(0x10), Address::FileOffset(0x10));

        let d1 = DynamicAddress::new(3, 0x10).unwrap();
        let d2 = DynamicAddress::new(3, 0x10).unwrap();
        let d3 = DynamicAddress::new(3, 0x11).unwrap();
        assert_eq!(d1, d2);
        assert_ne!(d1, d3);
    }

    #[test]
    fn test_hash_follows_equality() {
        use std::hash::BuildHasher;

        let state = std::collections::hash_map::RandomState::new();
        let pairs = [
            (Address::Absolute(0x10), Address::Absolute(0x10)),
            (
                Address::from(process(5, 1)),
                Address::from(process(5, 1)),
            ),
            (
                Address::from(TokenOffsetAddress::new(Token::new(0x0600_0001), 4).unwrap()),
                Address::from(TokenOffsetAddress::new(Token::new(0x0600_0001), 4).unwrap()),
            ),
            (Address::NoAddress, Address::NoAddress),
        ];
        for (a, b) in &pairs {
            assert_eq!(a, b);
            assert_eq!(state.hash_one(a), state.hash_one(b));
        }
    }

    #[test]
    fn test_addresses_as_map_keys() {
        let mut findings: HashMap<Address, &str> = HashMap::new();
        findings.insert(Address::Absolute(0x401000), "create-process");
        findings.insert(Address::file_offset(0x200).unwrap(), "embedded-pe");
        findings.insert(NO_ADDRESS, "sample-wide");

        assert_eq!(findings.get(&Address::Absolute(0x401000)), Some(&"create-process"));
        assert_eq!(findings.get(&NO_ADDRESS), Some(&"sample-wide"));
        assert_eq!(findings.get(&Address::Absolute(0x200)), None);
    }

    #[test]
    fn test_addresses_deduplicate_in_sets() {
        let p = Arc::new(process(10, 1));
        let mut set = BTreeSet::new();
        set.insert(Address::from(ThreadAddress::new(p.clone(), 5).unwrap()));
        set.insert(Address::from(ThreadAddress::new(p, 5).unwrap()));
        set.insert(Address::Relative(0x10));
        set.insert(Address::Relative(0x10));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Address::Absolute(0x401000).to_string(), "absolute(0x401000)");
        assert_eq!(Address::Relative(0x10).to_string(), "relative(0x10)");
        assert_eq!(Address::FileOffset(0x200).to_string(), "file(0x200)");
        assert_eq!(process(80, 77).to_string(), "process(ppid: 77, pid: 80)");
        assert_eq!(process(80, 0).to_string(), "process(pid: 80)");

        let t = ThreadAddress::new(Arc::new(process(80, 0)), 3).unwrap();
        assert_eq!(t.to_string(), "thread(tid: 3)");

        let d = DynamicAddress::new(5, 0x77).unwrap();
        assert_eq!(d.to_string(), "dynamic(event: 5, returnaddress: 0x77)");

        assert_eq!(
            Address::from(Token::new(0x0600_0001)).to_string(),
            "token(0x6000001)"
        );
        let to = TokenOffsetAddress::new(Token::new(0x0600_0001), 0x10).unwrap();
        assert_eq!(to.to_string(), "token(0x6000001)+(0x10)");

        assert_eq!(NO_ADDRESS.to_string(), "no address");
    }

    #[test]
    fn test_kind_names_cover_family() {
        assert_eq!(AddressKind::COUNT, 9);
        let names: BTreeSet<&str> = AddressKind::iter().map(AddressKind::name).collect();
        assert_eq!(names.len(), AddressKind::COUNT);
        assert!(names.contains("token_offset"));
        assert_eq!(Address::relative(1).kind(), AddressKind::Relative);
        assert_eq!(NO_ADDRESS.kind(), AddressKind::NoAddress);
    }

    #[test]
    fn test_serde_round_trip() {
        let p = Arc::new(process(31337, 1000));
        let addresses = vec![
            Address::absolute(0x401000).unwrap(),
            Address::relative(0x10),
            Address::file_offset(0x200).unwrap(),
            Address::from(*p),
            Address::from(ThreadAddress::new(p, 4).unwrap()),
            Address::from(DynamicAddress::new(9, 0x77).unwrap()),
            Address::from(Token::new(0x0600_0001)),
            Address::from(TokenOffsetAddress::new(Token::new(0x0600_0001), 0x10).unwrap()),
            NO_ADDRESS,
        ];
        for addr in &addresses {
            let json = serde_json::to_string(addr).unwrap();
            let back: Address = serde_json::from_str(&json).unwrap();
            assert_eq!(&back, addr, "lost structure through {json}");
        }
    }

    #[test]
    fn test_serde_type_tag() {
        let json = serde_json::to_string(&Address::Absolute(0x1000)).unwrap();
        assert!(json.contains("\"type\":\"absolute\""));
        assert!(json.contains("\"value\":4096"));

        let json = serde_json::to_string(&NO_ADDRESS).unwrap();
        assert_eq!(json, "{\"type\":\"no_address\"}");
    }

    fn sample(kind: AddressKind) -> Address {
        let p = Arc::new(process(1, 0));
        match kind {
            AddressKind::Absolute => Address::Absolute(1),
            AddressKind::Relative => Address::Relative(1),
            AddressKind::FileOffset => Address::FileOffset(1),
            AddressKind::Process => Address::from(*p),
            AddressKind::Thread => Address::from(ThreadAddress::new(p, 1).unwrap()),
            AddressKind::Dynamic => Address::from(DynamicAddress::new(1, 1).unwrap()),
            AddressKind::Token => Address::from(Token::new(1)),
            AddressKind::TokenOffset => {
                Address::from(TokenOffsetAddress::new(Token::new(1), 1).unwrap())
            }
            AddressKind::NoAddress => NO_ADDRESS,
        }
    }
}
