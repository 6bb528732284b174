//! Listing files: one JSON object per line, or a single JSON array.

use bson::Document as BsonDocument;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::utils::json::{bson_document_to_json, json_value_to_bson_document};

/// Read listings, detecting array mode from the first non-blank byte.
pub fn read_listings<R: Read>(reader: R) -> io::Result<Vec<BsonDocument>> {
    let mut br = BufReader::new(reader);
    let array_mode = loop {
        let buf = br.fill_buf()?;
        if buf.is_empty() {
            return Ok(Vec::new());
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => {
                let first = buf[i];
                br.consume(i);
                break first == b'[';
            }
            None => {
                let n = buf.len();
                br.consume(n);
            }
        }
    };

    if array_mode {
        let mut s = String::new();
        br.read_to_string(&mut s)?;
        let val: serde_json::Value =
            serde_json::from_str(&s).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let arr = val
            .as_array()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "expected JSON array"))?;
        return arr.iter().map(json_value_to_bson_document).collect();
    }

    let mut out = Vec::new();
    let mut line_no = 0usize;
    let mut buf = String::with_capacity(8 * 1024);
    loop {
        buf.clear();
        if br.read_line(&mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        let v: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("line {line_no}: {e}"))
        })?;
        out.push(json_value_to_bson_document(&v)?);
    }
    Ok(out)
}

pub fn write_listings<'a, W, I>(writer: W, docs: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a BsonDocument>,
{
    let mut w = BufWriter::new(writer);
    for doc in docs {
        let v = bson_document_to_json(doc).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(w, "{v}")?;
    }
    w.flush()
}

pub fn load_file(path: &Path) -> io::Result<Vec<BsonDocument>> {
    read_listings(File::open(path)?)
}

/// Write NDJSON to a temp file beside `path` and persist it over `path`.
pub fn save_file<'a, I>(path: &Path, docs: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a BsonDocument>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = NamedTempFile::new_in(parent)?;
    write_listings(&mut tmp, docs)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn reads_ndjson_skipping_blank_lines() {
        let input = "\n{\"_id\": 1, \"price\": 10}\n\n{\"_id\": 2}\n";
        let docs = read_listings(input.as_bytes()).unwrap();
        assert_eq!(docs, vec![doc! {"_id": 1, "price": 10}, doc! {"_id": 2}]);
    }

    #[test]
    fn reads_json_array() {
        let input = "  \n [ {\"_id\": 1}, {\"_id\": 2, \"t\": \"x\"} ]";
        let docs = read_listings(input.as_bytes()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].get_str("t").unwrap(), "x");
    }

    #[test]
    fn bad_line_reports_position() {
        let e = read_listings("{\"_id\": 1}\nnot json\n".as_bytes()).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);
        assert!(e.to_string().contains("line 2"));
    }

    #[test]
    fn empty_input() {
        assert!(read_listings("   \n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn save_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.ndjson");
        let docs = vec![doc! {"_id": 1, "stateMaloi": 2}, doc! {"_id": 2, "deleted": true}];
        save_file(&path, &docs).unwrap();
        assert_eq!(load_file(&path).unwrap(), docs);
    }
}
