//! # Mdoc Presentation Decoding
//!
//! Decodes the `vp_token` of an ISO/IEC 18013-5 (mdoc) presentation into
//! namespaced claim sets for display in a wallet's presentation history.
//!
//! A `vp_token` is a base64url-encoded, CBOR-encoded `DeviceResponse`. Each
//! returned `Document` carries an `IssuerSigned` section containing, per
//! namespace, an ordered list of tag-24 wrapped `IssuerSignedItem`s. The
//! decoder flattens these into [`DecodedClaims`], preserving both document
//! and item order as stored.
//!
//! Issuer and device authentication are parsed structurally only. Signature
//! and validity checking is left to a verifier.
//!
//! ```rust,ignore
//! let claims = vp_history_mdoc::decode_vp_token(&vp_token)?;
//! for group in &claims {
//!     println!("{}: {} items", group.namespace, group.items.len());
//! }
//! ```

pub mod mso_mdoc;
pub mod serde_cbor;

mod error;

pub use self::error::DecodeError;
pub use self::mso_mdoc::{
    ClaimItem, ClaimValue, DecodedClaims, DeviceResponseBuilder, DisplayFields, DocumentBuilder,
    NamespaceClaims, decode_vp_token,
};
