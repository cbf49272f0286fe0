//! Conversion between canonical dashed UUIDs and the API's undashed form.
//!
//! The Mojang API writes account ids as 32 bare hex digits
//! (`069a79f444e94726a5befca90e38aaf5`). Inside the crate every id is a
//! `Uuid`; this module is the only place the wire form is produced or read.

use uuid::Uuid;

use crate::error::ApiError;

/// Render `uuid` as 32 lowercase hex characters without dashes.
pub fn to_wire_form(uuid: Uuid) -> String {
    uuid.simple().to_string()
}

/// Parse a 32-character hex string (either case) into a `Uuid`.
pub fn from_wire_form(hex32: &str) -> Result<Uuid, ApiError> {
    if hex32.len() != 32 || !hex32.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ApiError::MalformedUuid(hex32.to_string()));
    }

    // Length and charset were checked above, so every slice is on a char boundary.
    let dashed = format!(
        "{}-{}-{}-{}-{}",
        &hex32[0..8],
        &hex32[8..12],
        &hex32[12..16],
        &hex32[16..20],
        &hex32[20..32],
    );
    Uuid::parse_str(&dashed).map_err(|_| ApiError::MalformedUuid(hex32.to_string()))
}

/// Serde adapter for `Uuid` fields that travel in wire form.
///
/// Use with `#[serde(with = "crate::uuid_codec::wire")]`.
pub mod wire {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(uuid: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_wire_form(*uuid))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::from_wire_form(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTCH: &str = "069a79f4-44e9-4726-a5be-fca90e38aaf5";

    #[test]
    fn wire_form_strips_dashes() {
        let id: Uuid = NOTCH.parse().unwrap();
        let wire = to_wire_form(id);
        assert_eq!(wire, "069a79f444e94726a5befca90e38aaf5");
        assert_eq!(wire.len(), 32);
        assert!(!wire.contains('-'));
    }

    #[test]
    fn wire_form_of_nil_is_all_zeroes() {
        assert_eq!(to_wire_form(Uuid::nil()), "0".repeat(32));
    }

    #[test]
    fn from_wire_form_inserts_dashes() {
        let id = from_wire_form("069a79f444e94726a5befca90e38aaf5").unwrap();
        assert_eq!(id.to_string(), NOTCH);
    }

    #[test]
    fn from_wire_form_accepts_uppercase() {
        let id = from_wire_form("069A79F444E94726A5BEFCA90E38AAF5").unwrap();
        assert_eq!(id.to_string(), NOTCH);
    }

    #[test]
    fn round_trip_random_ids() {
        for _ in 0..64 {
            let id = Uuid::new_v4();
            assert_eq!(from_wire_form(&to_wire_form(id)).unwrap(), id);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        for input in [
            "",
            "069a79f4",
            "069a79f444e94726a5befca90e38aaf",
            "069a79f444e94726a5befca90e38aaf50",
        ] {
            let err = from_wire_form(input).unwrap_err();
            assert!(matches!(err, ApiError::MalformedUuid(ref s) if s == input), "{input}");
        }
    }

    #[test]
    fn rejects_dashed_input() {
        assert!(matches!(from_wire_form(NOTCH), Err(ApiError::MalformedUuid(_))));
    }

    #[test]
    fn rejects_non_hex_characters() {
        let err = from_wire_form("069a79f444e94726a5befca90e38aazz").unwrap_err();
        assert!(matches!(err, ApiError::MalformedUuid(_)));
        // 32 bytes but multi-byte characters; must not panic on slicing.
        let err = from_wire_form(&format!("{}hh", "é".repeat(15))).unwrap_err();
        assert!(matches!(err, ApiError::MalformedUuid(_)));
    }

    #[test]
    fn serde_adapter_reads_and_writes_wire_form() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Holder {
            #[serde(with = "super::wire")]
            id: Uuid,
        }

        let holder: Holder =
            serde_json::from_str(r#"{"id":"069a79f444e94726a5befca90e38aaf5"}"#).unwrap();
        assert_eq!(holder.id.to_string(), NOTCH);
        let json = serde_json::to_value(&holder).unwrap();
        assert_eq!(json["id"], "069a79f444e94726a5befca90e38aaf5");

        let bad: Result<Holder, _> = serde_json::from_str(&format!(r#"{{"id":"{NOTCH}"}}"#));
        assert!(bad.is_err());
    }
}
