//! # findscope Prelude
//!
//! A convenient prelude for the most commonly used types. Producers and
//! consumers of findings can glob-import this module instead of naming each
//! address and report type individually.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all findscope operations
pub use crate::Error;

/// The result type used throughout findscope
pub use crate::Result;

// ================================================================================================
// Addressing
// ================================================================================================

/// The closed location family and its sentinel
pub use crate::address::{Address, AddressKind, NO_ADDRESS};

/// Dynamic-trace coordinates
pub use crate::address::{DynamicAddress, ProcessAddress, ThreadAddress};

/// .NET metadata-token locations
pub use crate::address::{Token, TokenOffsetAddress};

// ================================================================================================
// Reporting
// ================================================================================================

/// Result-document assembly and rendering
pub use crate::report::{
    Flavor, MatchResults, Metadata, ResultDocument, Rule, RuleMatches, RuleSet, SampleIdentity,
    render_json,
};
