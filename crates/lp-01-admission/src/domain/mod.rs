//! Domain layer of the admission subsystem.

pub mod errors;
pub mod validator;
pub mod value_objects;

pub use errors::{AdmissionError, EmulatorFailure, NonceMismatch, ValidationError, NONCE_ERROR_CODE};
pub use validator::{max_u64, TxValidator};
pub use value_objects::PrecheckResult;
