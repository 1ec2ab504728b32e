//! Token types shared across Zakaion services.
//!
//! Provides the HS256 [`TokenCodec`](token::TokenCodec) and the
//! [`BearerIdentity`](identity::BearerIdentity) extractor.

pub mod identity;
pub mod token;
