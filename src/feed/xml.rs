use crate::error::FeedError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use serde_json::{Map, Value};

/// Converts an XML document into a JSON tree.
///
/// Mapping: elements become objects, attributes become `"@name"` keys, and
/// text next to attributes or children becomes `"#text"`. A text-only
/// element becomes a string and an empty one `null`. Repeated siblings
/// collapse into an array, so a single child stays a lone object.
pub fn to_json(xml: &str) -> Result<Value, FeedError> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Map<String, Value>> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            FeedError::Xml(format!("{} at byte {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(ref e) => stack.push(Frame::open(e)?),
            Event::Empty(ref e) => {
                let frame = Frame::open(e)?;
                attach(&mut stack, &mut root, frame)?;
            }
            Event::Text(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| FeedError::Xml("closing tag without opening tag".into()))?;
                attach(&mut stack, &mut root, frame)?;
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::Xml(format!("unclosed element <{}>", open.name)));
    }
    root.map(Value::Object)
        .ok_or_else(|| FeedError::Xml("document has no root element".into()))
}

struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart) -> Result<Self, FeedError> {
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value()?.into_owned();
            fields.insert(key, Value::String(value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
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

        let value = if fields.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text)
            }
        } else {
            if !text.is_empty() {
                fields.insert("#text".to_string(), Value::String(text));
            }
            Value::Object(fields)
        };
        (name, value)
    }
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<Map<String, Value>>,
    frame: Frame,
) -> Result<(), FeedError> {
    let (name, value) = frame.close();

    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.fields, name, value),
        None if root.is_some() => {
            return Err(FeedError::Xml(format!("second root element <{}>", name)));
        }
        None => {
            let mut map = Map::new();
            map.insert(name, value);
            *root = Some(map);
        }
    }
    Ok(())
}

fn insert_child(fields: &mut Map<String, Value>, name: String, value: Value) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attributes_text_and_repeats() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <Details>
                <ListPrice currency="BRL">450000</ListPrice>
                <Bedrooms>3</Bedrooms>
                <Features>
                    <Feature>Piscina</Feature>
                    <Feature>Elevador</Feature>
                </Features>
                <Notes/>
            </Details>"#;

        let tree = to_json(xml).unwrap();
        assert_eq!(
            tree,
            json!({
                "Details": {
                    "ListPrice": {"@currency": "BRL", "#text": "450000"},
                    "Bedrooms": "3",
                    "Features": {"Feature": ["Piscina", "Elevador"]},
                    "Notes": null
                }
            })
        );
    }

    #[test]
    fn single_child_stays_an_object() {
        let tree = to_json("<Listings><Listing><Title>Casa</Title></Listing></Listings>").unwrap();
        assert_eq!(tree, json!({"Listings": {"Listing": {"Title": "Casa"}}}));
    }

    #[test]
    fn cdata_and_entities_are_text() {
        let tree =
            to_json("<D><A><![CDATA[<b>Sala</b> ampla]]></A><B>P&amp;B</B></D>").unwrap();
        assert_eq!(tree["D"]["A"], "<b>Sala</b> ampla");
        assert_eq!(tree["D"]["B"], "P&B");
    }

    #[test]
    fn three_repeats_make_one_array() {
        let tree = to_json("<L><I>1</I><I>2</I><I>3</I></L>").unwrap();
        assert_eq!(tree, json!({"L": {"I": ["1", "2", "3"]}}));
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(matches!(to_json("<A><B></A>"), Err(FeedError::Xml(_))));
        assert!(matches!(to_json("<A>"), Err(FeedError::Xml(_))));
        assert!(matches!(to_json(""), Err(FeedError::Xml(_))));
    }
}
