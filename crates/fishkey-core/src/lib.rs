//! Seafood catalog description parsing and comparability matching.
//!
//! Free-text distributor descriptions such as `SALMON FIL ATL SKON DTRM 6OZ`
//! are normalized, resolved against the reference tables into an
//! [`AttributeRecord`], projected onto a comparison key, and compared by the
//! [`Matcher`].

pub mod alias;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod extract;
pub mod freeze;
pub mod key;
pub mod matcher;
pub mod normalize;
pub mod record;
pub mod reference;

pub use alias::{AliasIndex, AttributeFamily, builtin};
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{FishkeyError, FishkeyResult};
pub use freeze::FreezeCycle;
pub use key::comparison_key;
pub use matcher::{HardBlock, MatchResult, Matcher, RankedMatch};
pub use record::{Attribute, AttributeRecord, parse, parse_batch};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
