//! Identifier helpers
//!
//! Identifiers are uuid7 values encoded with bech32 under a short
//! human-readable prefix. The bech32 alphabet is not ASCII-ordered, so
//! the encoded strings carry no ordering; anything time-ordered sorts on
//! a stored timestamp instead.

use bech32::Bech32m;
use uuid7::uuid7;

pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

pub fn new_request_id() -> anyhow::Result<String> {
    new_uuid_to_bech32("req")
}

pub fn new_decision_id() -> anyhow::Result<String> {
    new_uuid_to_bech32("dec")
}

pub fn new_user_id() -> anyhow::Result<String> {
    new_uuid_to_bech32("user")
}
