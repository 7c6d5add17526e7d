//! Value encoding at the storage boundary.
//!
//! Values are kept as compact JSON text in a string column. Scalars are stored
//! as bare JSON scalars, so a string value stays a string on the way back.
//! Numbers keep their written digits and objects keep their key order.

use serde_json::Value as JsonValue;

use super::PersistenceError;

/// Encode a value for storage
pub fn encode(value: &JsonValue) -> Result<String, PersistenceError> {
    serde_json::to_string(value).map_err(PersistenceError::Encode)
}

/// Decode a stored value
pub fn decode(text: &str) -> Result<JsonValue, PersistenceError> {
    serde_json::from_str(text).map_err(PersistenceError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(value: JsonValue) -> JsonValue {
        decode(&encode(&value).unwrap()).unwrap()
    }

    #[test]
    fn test_bare_string_is_not_wrapped() {
        let encoded = encode(&json!("simple-string-value")).unwrap();
        assert_eq!(encoded, "\"simple-string-value\"");
        assert_eq!(decode(&encoded).unwrap(), json!("simple-string-value"));
    }

    #[test]
    fn test_nested_object_matches_input() {
        let value = json!({"foo": "bar", "nested": {"data": "value"}});
        assert_eq!(round_trip(value.clone()), value);
    }

    #[test]
    fn test_deeply_nested_structure() {
        let value = json!({
            "level1": {
                "level2": {
                    "level3": {
                        "data": "deep-value",
                        "numbers": [1, 2, 3, 4, 5]
                    }
                }
            },
            "metadata": {
                "created_by": "test-user",
                "tags": ["important", "test"]
            }
        });
        assert_eq!(round_trip(value.clone()), value);
    }

    #[test]
    fn test_empty_containers_keep_their_shape() {
        assert_eq!(round_trip(json!({})), json!({}));
        assert_eq!(round_trip(json!([])), json!([]));
        assert_eq!(encode(&json!([])).unwrap(), "[]");
    }

    #[test]
    fn test_numbers_are_exact() {
        let value = json!({"integer": 42, "float": 3.14, "negative": -100, "tiny": 1e-300});
        let back = round_trip(value);
        assert_eq!(back["integer"].as_i64(), Some(42));
        assert_eq!(back["float"].as_f64(), Some(3.14));
        assert_eq!(back["negative"].as_i64(), Some(-100));
        assert_eq!(back["tiny"].as_f64(), Some(1e-300));
    }

    #[test]
    fn test_float_survives_bit_for_bit() {
        let f = 0.1_f64 + 0.2_f64;
        let back = round_trip(json!(f));
        assert_eq!(back.as_f64().map(f64::to_bits), Some(f.to_bits()));
    }

    #[test]
    fn test_booleans_and_null() {
        let value = json!({"active": true, "disabled": false, "nothing": null});
        let back = round_trip(value);
        assert_eq!(back["active"], json!(true));
        assert_eq!(back["disabled"], json!(false));
        assert!(back["nothing"].is_null());
    }

    fn stored_text(input: &str) -> String {
        encode(&decode(input).unwrap()).unwrap()
    }

    #[test]
    fn test_integer_beyond_64_bits_is_kept() {
        let input = "12345678901234567890123";
        assert_eq!(stored_text(input), input);
    }

    #[test]
    fn test_high_precision_decimal_is_kept() {
        let input = "0.10000000000000000000000001";
        assert_eq!(stored_text(input), input);
    }

    #[test]
    fn test_object_key_order_is_kept() {
        let input = r#"{"zeta":1,"alpha":2,"mid":{"b":true,"a":false}}"#;
        assert_eq!(stored_text(input), input);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, PersistenceError::Decode(_)));
    }
}
