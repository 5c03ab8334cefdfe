//! TLS 1.2 record protection and key schedule.
//!
//! ```text
//! tls12/
//! ├── mod.rs            - Module root (this file)
//! ├── cipher_suites.rs  - Supported suites and their key parameters
//! ├── prf.rs            - RFC 5246 PRF (P_SHA256 / P_SHA384)
//! ├── key_schedule.rs   - Master secret, key block, Finished verify data
//! └── record.rs         - CBC+HMAC and AES-GCM record encryption
//! ```
//!
//! Only the cryptographic layer lives here. Message parsing, the handshake
//! state machine and key exchange are the caller's business.

pub mod cipher_suites;
pub mod key_schedule;
pub mod prf;
pub mod record;

pub use cipher_suites::{
    default_cipher_suites, BulkCipher, CipherSuite, KeyExchange, MacAlgorithm, SuiteParams,
};
pub use key_schedule::{ConnectionKeys, KeyBlock, KeyBlockLayout, KeySchedule, Side};
pub use prf::{prf, Tls12Prf};
pub use record::RecordProtector;
