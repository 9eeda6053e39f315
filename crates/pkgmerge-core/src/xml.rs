//! XML Codec
//!
//! Converts package.xml text to and from `Document` trees.
//!
//! Mapping rules:
//! - text-only element → string
//! - element with children or attributes → mapping (`@attr` keys, `#text` for text)
//! - repeated sibling elements → sequence, in document order
//! - empty element → `null`

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use crate::document::{Document, ATTRIBUTE_PREFIX, TEXT_KEY};
use crate::error::CodecError;

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Element under construction
struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, CodecError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();

        for attr in start.attributes() {
            let attr = attr?;
            let key = format!(
                "{}{}",
                ATTRIBUTE_PREFIX,
                String::from_utf8_lossy(attr.key.as_ref())
            );
            fields.insert(key, Value::String(attr.unescape_value()?.into_owned()));
        }

        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let Frame {
            name,
            mut fields,
            text,
        } = self;

        let value = match (fields.is_empty(), text.is_empty()) {
            (true, true) => Value::Null,
            (true, false) => Value::String(text),
            (false, true) => Value::Object(fields),
            (false, false) => {
                fields.insert(TEXT_KEY.to_string(), Value::String(text));
                Value::Object(fields)
            }
        };
        (name, value)
    }
}

/// Add a child, collapsing repeats of the same name into a sequence
fn push_child(fields: &mut Map<String, Value>, name: String, value: Value) {
    match fields.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name, value);
        }
    }
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    name: String,
    value: Value,
) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(parent) => push_child(&mut parent.fields, name, value),
        None if root.is_some() => return Err(CodecError::MultipleRoots(name)),
        None => *root = Some((name, value)),
    }
    Ok(())
}

/// Parse XML text into a document whose single key is the root element name.
pub fn parse_document(input: &str) -> Result<Document, CodecError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::End(end) => {
                let Some(frame) = stack.pop() else {
                    return Err(CodecError::UnbalancedClose(
                        String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    ));
                };
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(CodecError::Unclosed(frame.name.clone()));
    }

    let (name, value) = root.ok_or(CodecError::NoRoot)?;
    let mut doc = Map::new();
    doc.insert(name, value);
    Ok(Value::Object(doc))
}

// ── Rendering ───────────────────────────────────────────────────────────────

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
        }
        Value::Null => writer.write_event(Event::Empty(BytesStart::new(name)))?,
        Value::Object(fields) => {
            let mut start = BytesStart::new(name);
            for (key, attr) in fields {
                if let Some(attr_name) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    let text = scalar_text(attr);
                    start.push_attribute((attr_name, text.as_str()));
                }
            }

            let mut children = fields
                .iter()
                .filter(|(key, _)| !key.starts_with(ATTRIBUTE_PREFIX))
                .peekable();

            if children.peek().is_none() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            for (key, child) in children {
                if key == TEXT_KEY {
                    let text = scalar_text(child);
                    writer.write_event(Event::Text(BytesText::new(&text)))?;
                } else {
                    write_element(writer, key, child)?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        scalar => {
            let text = scalar_text(scalar);
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

/// Render a document as pretty-printed, tab-indented XML.
pub fn render_document(doc: &Document) -> Result<String, CodecError> {
    let Value::Object(map) = doc else {
        return Err(CodecError::NotRenderable);
    };
    if map.len() != 1 {
        return Err(CodecError::NotRenderable);
    }
    let (name, value) = map.iter().next().ok_or(CodecError::NotRenderable)?;
    if value.is_array() {
        return Err(CodecError::NotRenderable);
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, name, value)?;

    let mut out = String::from_utf8(writer.into_inner())?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Package xmlns="http://soap.sforce.com/2006/04/metadata">
    <!-- core metadata -->
    <fullName>core</fullName>
    <types>
        <members>Foo</members>
        <members>Bar</members>
        <name>ApexClass</name>
    </types>
    <types>
        <members>Account-Account Layout</members>
        <name>Layout</name>
    </types>
    <version>58.0</version>
</Package>
"#;

    #[test]
    fn test_parse_package() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_eq!(
            doc,
            json!({"Package": {
                "@xmlns": "http://soap.sforce.com/2006/04/metadata",
                "fullName": "core",
                "types": [
                    {"members": ["Foo", "Bar"], "name": "ApexClass"},
                    {"members": "Account-Account Layout", "name": "Layout"}
                ],
                "version": "58.0"
            }})
        );
    }

    #[test]
    fn test_parse_single_types_is_record() {
        let doc = parse_document(
            "<Package><types><members>Foo</members><name>ApexClass</name></types><version>59.0</version></Package>",
        )
        .unwrap();
        assert_eq!(doc["Package"]["types"], json!({"members": "Foo", "name": "ApexClass"}));
    }

    #[test]
    fn test_parse_entities_cdata_and_empty() {
        let doc = parse_document(
            "<Package><description>A &amp; B</description><note><![CDATA[<raw>]]></note><members/></Package>",
        )
        .unwrap();
        assert_eq!(doc["Package"]["description"], "A & B");
        assert_eq!(doc["Package"]["note"], "<raw>");
        assert_eq!(doc["Package"]["members"], Value::Null);
    }

    #[test]
    fn test_parse_attribute_with_text() {
        let doc = parse_document(r#"<Package><version kind="api">59.0</version></Package>"#).unwrap();
        assert_eq!(doc["Package"]["version"], json!({"@kind": "api", "#text": "59.0"}));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_document(""), Err(CodecError::NoRoot)));
        assert!(matches!(parse_document("<!-- only a comment -->"), Err(CodecError::NoRoot)));
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(CodecError::MultipleRoots(name)) if name == "b"
        ));
        assert!(parse_document("<Package><types></Package>").is_err());
        assert!(parse_document("<Package><types>").is_err());
    }

    #[test]
    fn test_render_package() {
        let doc = json!({"Package": {
            "@xmlns": "http://soap.sforce.com/2006/04/metadata",
            "fullName": "Merged_Package",
            "description": "line one\nline <two>",
            "types": [
                {"members": ["Bar", "Foo"], "name": "ApexClass"},
                {"members": ["X"], "name": "Layout"}
            ],
            "version": "59.0"
        }});

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<Package xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n\
\t<fullName>Merged_Package</fullName>\n\
\t<description>line one\nline &lt;two&gt;</description>\n\
\t<types>\n\
\t\t<members>Bar</members>\n\
\t\t<members>Foo</members>\n\
\t\t<name>ApexClass</name>\n\
\t</types>\n\
\t<types>\n\
\t\t<members>X</members>\n\
\t\t<name>Layout</name>\n\
\t</types>\n\
\t<version>59.0</version>\n\
</Package>\n";

        assert_eq!(render_document(&doc).unwrap(), expected);
    }

    #[test]
    fn test_render_then_parse_preserves_document() {
        let doc = parse_document(SAMPLE).unwrap();
        let rendered = render_document(&doc).unwrap();
        assert_eq!(parse_document(&rendered).unwrap(), doc);
    }

    #[test]
    fn test_render_rejects_non_document() {
        assert!(matches!(render_document(&json!("x")), Err(CodecError::NotRenderable)));
        assert!(matches!(render_document(&json!({"a": 1, "b": 2})), Err(CodecError::NotRenderable)));
        assert!(matches!(render_document(&json!({"a": [1, 2]})), Err(CodecError::NotRenderable)));
    }
}
