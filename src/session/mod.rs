//! Session state and request signing
//!
//! This module holds the cookie state of a client instance, the signer
//! collaborator seams, an HTTP-backed signer, and the composer that turns
//! signer output into per-request headers.

pub mod headers;
pub mod remote;
pub mod signer;
pub mod state;

pub use headers::{HeaderComposer, SignedHeaders};
pub use remote::RemoteSigner;
pub use signer::{CommonDeriver, Signature, Signer, Unsigned};
pub use state::{SessionState, cookie_field, parse_cookie};
