//! This module contains basic base64 functionality as used in Hawk.

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// BEWIT_ENGINE encodes to a url-safe value with no padding, and accepts padded or unpadded
/// input when decoding.
pub(crate) const BEWIT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// STANDARD_ENGINE encodes with the standard alphabet and includes padding.
pub(crate) const STANDARD_ENGINE: GeneralPurpose = base64::engine::general_purpose::STANDARD;

pub fn encode<T: AsRef<[u8]>>(data: T) -> String {
    STANDARD_ENGINE.encode(data)
}

pub fn decode<T: AsRef<[u8]>>(data: T) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD_ENGINE.decode(data)
}

pub fn encode_url_no_pad<T: AsRef<[u8]>>(data: T) -> String {
    BEWIT_ENGINE.encode(data)
}

pub fn decode_url<T: AsRef<[u8]>>(data: T) -> Result<Vec<u8>, base64::DecodeError> {
    BEWIT_ENGINE.decode(data)
}
