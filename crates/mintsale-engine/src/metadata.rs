//! Collection metadata and token URI resolution.

use mintsale_types::constants::{TOKEN_URI_SEPARATOR, TOKEN_URI_SUFFIX};
use mintsale_types::{MetadataField, SaleMetadata, SalePhase, TokenId};

/// Resolve the metadata URI of `id`.
///
/// Before the reveal (phase `Pending`) and for ids nobody owns yet, every
/// token points at the pending URI.
#[must_use]
pub fn token_uri(metadata: &SaleMetadata, phase: SalePhase, id: TokenId, minted: bool) -> String {
    if phase == SalePhase::Pending || !minted {
        return metadata.pending_token_uri.clone();
    }
    format!(
        "{}{TOKEN_URI_SEPARATOR}{id}{TOKEN_URI_SUFFIX}",
        metadata.base_token_uri
    )
}

/// Overwrite one field; returns the previous value.
pub fn update(metadata: &mut SaleMetadata, field: MetadataField, value: String) -> String {
    let slot = match field {
        MetadataField::ContractUri => &mut metadata.contract_uri,
        MetadataField::BaseTokenUri => &mut metadata.base_token_uri,
        MetadataField::PendingTokenUri => &mut metadata.pending_token_uri,
    };
    std::mem::replace(slot, value)
}
