use std::io;

/// Convert a serde_json::Value that must be an object into a bson::Document.
/// Returns io::Error with InvalidData on malformed input.
pub fn json_value_to_bson_document(val: &serde_json::Value) -> io::Result<bson::Document> {
    let obj = val
        .as_object()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "expected JSON object"))?;
    bson::Document::try_from(obj.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

/// Render a stored document as plain JSON for response payloads.
pub fn bson_document_to_json(doc: &bson::Document) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(doc)
}
