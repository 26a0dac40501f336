//! Testing utilities for the container codec
//!
//! - **Corruption**: stream damage simulation for decoder error testing
//!
//! # Example
//!
//! ```ignore
//! use hvf_format::testing::CorruptionTester;
//!
//! let mut tester = CorruptionTester::new(bytes);
//! tester.append_garbage(b"\0");
//! let verification = tester.verify_decode(&DecodeConfig::default());
//! assert!(verification.error.is_some());
//! ```

mod corruption;

pub use corruption::{
    CorruptionResult, CorruptionTester, DecodeVerification, GarbageResult, TruncationResult,
};
