// src/body.rs
use crate::multimap::MultiMap;
use crate::multipart::Multipart;
use std::io::Read;

/// Descriptor for one uploaded file field.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// `(form, files)` as produced by `parse_body`; both are `None` when the
/// content type is unrecognized.
pub type ParsedBody = (Option<MultiMap<String>>, Option<MultiMap<UploadedFile>>);

/// Classify and parse a request body.
///
/// Reads at most `clength` bytes from `reader`, and only when the content
/// type calls for it; an unrecognized type leaves the reader untouched. The
/// reader is one-shot, so this is called at most once per request (the
/// request facade memoizes the result). Malformed input degrades to empty or
/// partial mappings — this layer never fails.
pub fn parse_body(ctype: &str, clength: u64, reader: &mut dyn Read) -> ParsedBody {
    if ctype.starts_with("application/x") {
        let raw = drain(reader, clength);
        (Some(parse_urlencoded(&raw)), None)
    } else if ctype.starts_with("multipart") {
        let raw = drain(reader, clength);
        let (form, files) = parse_multipart(&raw, ctype);
        (Some(form), Some(files))
    } else {
        (None, None)
    }
}

/// Decode an url-encoded byte string into an ordered multimap, blank values
/// kept. Invalid percent-sequences decode lossily rather than failing.
pub fn parse_urlencoded(raw: &[u8]) -> MultiMap<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(raw)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

fn parse_multipart(raw: &[u8], ctype: &str) -> (MultiMap<String>, MultiMap<UploadedFile>) {
    let mut form = MultiMap::new();
    let mut files = MultiMap::new();

    let Some(parts) = Multipart::from_content_type(raw, ctype) else {
        return (form, files);
    };
    for part in parts {
        let Some(name) = part.name else { continue };
        match part.filename {
            Some(filename) => files.append(
                name,
                UploadedFile {
                    filename: filename.to_string(),
                    content_type: part.content_type.map(str::to_string),
                    data: part.body.to_vec(),
                },
            ),
            None => form.append(name, String::from_utf8_lossy(part.body).into_owned()),
        }
    }
    (form, files)
}

fn drain(reader: &mut dyn Read, clength: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(clength.min(64 * 1024) as usize);
    // a short or failing stream surfaces as a partial body, not an error
    let _ = reader.take(clength).read_to_end(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn urlencoded_keeps_blank_values() {
        let m = parse_urlencoded(b"t=satie&p=&solo");
        assert_eq!(m.get("t").map(String::as_str), Some("satie"));
        assert_eq!(m.get("p").map(String::as_str), Some(""));
        assert_eq!(m.get("solo").map(String::as_str), Some(""));
    }

    #[test]
    fn urlencoded_decodes_plus_and_percent() {
        let m = parse_urlencoded(b"msg=hello+world%21");
        assert_eq!(m.get("msg").map(String::as_str), Some("hello world!"));
    }

    #[test]
    fn invalid_percent_sequences_decode_lossily() {
        // %ff%fe is not valid UTF-8; the key comes through as replacement
        // characters instead of failing the whole parse
        let m = parse_urlencoded(b"%ff%fe=broken");
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("\u{fffd}\u{fffd}").map(String::as_str), Some("broken"));
    }

    #[test]
    fn urlencoded_body() {
        let body = b"a=1&a=2&b=3";
        let mut reader = Cursor::new(&body[..]);
        let (form, files) =
            parse_body("application/x-www-form-urlencoded", body.len() as u64, &mut reader);
        let form = form.expect("form present");
        assert!(files.is_none());
        assert_eq!(form.get("a").map(String::as_str), Some("2"));
        assert_eq!(form.get_all("a").len(), 2);
    }

    #[test]
    fn multipart_body_splits_fields_and_files() {
        let boundary = "XBOUNDARYX";
        let mut body = Vec::new();
        body.extend_from_slice(b"--XBOUNDARYX\r\n");
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"title\"\r\n\r\n");
        body.extend_from_slice(b"gnossienne\r\n");
        body.extend_from_slice(b"--XBOUNDARYX\r\n");
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"upload\"; filename=\"s.txt\"\r\n\r\n",
        );
        body.extend_from_slice(b"file payload\r\n");
        body.extend_from_slice(b"--XBOUNDARYX--\r\n");

        let ctype = format!("multipart/form-data; boundary={}", boundary);
        let mut reader = Cursor::new(body.clone());
        let (form, files) = parse_body(&ctype, body.len() as u64, &mut reader);
        let form = form.expect("form present");
        let files = files.expect("files present");

        assert_eq!(form.get("title").map(String::as_str), Some("gnossienne"));
        let uploads = files.get_all("upload");
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].filename, "s.txt");
        assert_eq!(uploads[0].data, b"file payload");
    }

    #[test]
    fn unrecognized_type_leaves_reader_untouched() {
        let mut reader = Cursor::new(b"raw bytes".to_vec());
        let (form, files) = parse_body("text/plain", 9, &mut reader);
        assert!(form.is_none());
        assert!(files.is_none());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn short_stream_degrades_to_partial_body() {
        // content length claims more than the stream holds
        let body = b"a=1";
        let mut reader = Cursor::new(&body[..]);
        let (form, _) = parse_body("application/x-www-form-urlencoded", 1024, &mut reader);
        assert_eq!(form.expect("form present").get("a").map(String::as_str), Some("1"));
    }
}
