// Copyright 2026 the findscope developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # findscope
//!
//! The shared core of a capability-detection pipeline for binaries and
//! dynamic execution traces: one closed family of location identifiers, the
//! [`address::Address`] type, plus the [`report`] boundary that serializes
//! findings keyed by those locations into a structured result document.
//!
//! Heterogeneous analysis backends describe where a finding was observed in
//! fundamentally different coordinate systems: offsets into the file image,
//! relocated virtual memory, .NET metadata tokens, or process/thread/event
//! coordinates inside a recorded trace. `findscope` binds them into one
//! consistent, orderable, hashable key space so the matching engine can
//! deduplicate, group, and sort findings without knowing which backend
//! produced them.
//!
//! ## Quick Start
//!
//! ```rust
//! use findscope::prelude::*;
//!
//! // a static backend locates a finding in the file image
//! let at_offset = Address::file_offset(0x200)?;
//!
//! // a dynamic backend locates one in a traced process
//! let process = ProcessAddress::new(31337, 1000)?;
//! let in_trace = Address::from(process);
//!
//! // both live in the same ordered, hashable key space
//! let mut findings = std::collections::BTreeSet::new();
//! findings.insert(at_offset);
//! findings.insert(in_trace);
//! assert_eq!(findings.len(), 2);
//! # Ok::<(), findscope::Error>(())
//! ```
//!
//! ## Guarantees
//!
//! - **Total order.** Any two addresses compare, across variants, under a
//!   fixed variant priority; collections of mixed findings sort
//!   deterministically.
//! - **Hash/equality consistency.** Equal addresses hash equally, so they are
//!   safe map keys and set members.
//! - **Total rendering.** Every address has a human-readable display form and
//!   a lossless type-tagged serialized form; neither can fail.
//! - **Immutability.** Addresses never change after construction and are
//!   freely sharable across worker threads.
//!
//! Construction is the only fallible step: range invariants (non-negative
//! offsets, positive pids) are checked once, and violations surface as
//! [`Error::OutOfRange`].

pub mod address;
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use findscope::prelude::*;
///
/// let location = Address::absolute(0x401000)?;
/// assert_eq!(location.to_string(), "absolute(0x401000)");
/// # Ok::<(), findscope::Error>(())
/// ```
pub mod prelude;

/// Structured result documents aggregating run metadata, rules, and match
/// locations, serialized as JSON for downstream consumers.
///
/// See [`report::ResultDocument`] and [`report::render_json`].
pub mod report;

/// `findscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] used by every fallible
/// operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// `findscope` Error type
///
/// Construction-time validation failures and report-boundary serialization
/// failures. See [`Error::OutOfRange`] and [`Error::Serialization`].
pub use error::Error;

/// The location family shared by all analysis backends.
///
/// See [`address::Address`] for the variant list and the comparison
/// contract.
pub use address::{Address, NO_ADDRESS};
