//! # Upgrader Bytecode
//!
//! Data model for mobile operator upgraders: small bytecode programs that
//! rewrite operator calls serialized by older model versions.
//!
//! ## Contents
//!
//! - **Raw shapes** ([`raw`]): what the upstream sources produce, untyped
//! - **Validated descriptions** ([`function`]): instructions, constants,
//!   types, operator calls and register count, checked at construction
//! - **Version references** ([`version`]): `[min, max]` windows that point an
//!   operator at an upgrader by name

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constant;
pub mod error;
pub mod function;
pub mod instruction;
pub mod operator;
pub mod raw;
pub mod version;

pub use constant::Constant;
pub use error::{BytecodeError, Result};
pub use function::{ByteCodeField, ByteCodeTable, BytecodeDescription, BytecodeDescriptionBuilder};
pub use instruction::{Instruction, OpCode};
pub use operator::OperatorString;
pub use raw::{RawBytecodeDescription, RawUpgraderEntry, RawVersionTable};
pub use version::{UpgraderReference, parse_version_bounds};
