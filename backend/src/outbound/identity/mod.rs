//! Identity provider adapters.

mod google_token_verifier;

pub use google_token_verifier::{DEFAULT_TOKENINFO_URL, GoogleTokenVerifier};
