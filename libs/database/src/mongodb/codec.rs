//! BSON values in the form collection writes store them.
//!
//! `insert_one` and `replace_one` go through the driver's raw serializer,
//! which is not human-readable: a `Uuid` lands as generic binary, not as a
//! string. Filters and `$set` values must use the same form or they never
//! match.

use mongodb::bson::{Binary, Bson, spec::BinarySubtype, to_raw_document_buf};
use serde::Serialize;
use uuid::Uuid;

use crate::common::{DatabaseError, DatabaseResult};

const FIELD: &str = "value";

#[derive(Serialize)]
struct Wrapped<'a, T: ?Sized> {
    value: &'a T,
}

/// A `Uuid` as stored by `insert_one`
pub fn uuid_bson(id: &Uuid) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    })
}

/// Serialize `value` with the raw serializer, for use in filters and updates.
pub fn to_stored_bson<T: Serialize + ?Sized>(value: &T) -> DatabaseResult<Bson> {
    let raw = to_raw_document_buf(&Wrapped { value })
        .map_err(|e| DatabaseError::Encode(e.to_string()))?;
    let mut document = raw
        .to_document()
        .map_err(|e| DatabaseError::Encode(e.to_string()))?;

    document
        .remove(FIELD)
        .ok_or_else(|| DatabaseError::Encode(format!("missing `{FIELD}` after encoding")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, to_bson};

    #[derive(Serialize)]
    struct Line {
        #[serde(rename = "productId")]
        product_id: Uuid,
        quantity: i32,
    }

    #[test]
    fn test_uuid_matches_raw_serializer() {
        let id = Uuid::now_v7();
        assert_eq!(to_stored_bson(&id).unwrap(), uuid_bson(&id));
        // The human-readable serializer disagrees, which is why filters avoid it
        assert_ne!(to_bson(&id).unwrap(), uuid_bson(&id));
    }

    #[test]
    fn test_nested_uuids_are_binary() {
        let id = Uuid::now_v7();
        let lines = vec![Line {
            product_id: id,
            quantity: 2,
        }];

        let encoded = to_stored_bson(&lines).unwrap();
        assert_eq!(
            encoded,
            Bson::Array(vec![Bson::Document(
                doc! { "productId": uuid_bson(&id), "quantity": 2 }
            )])
        );
    }
}
