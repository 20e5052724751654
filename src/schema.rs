//! XML schema loader.
//!
//! Parses an AMQP type-system schema document: an `<amqp>` root containing
//! `<section>`s of `<type>` declarations, each carrying
//! `<encoding>`/`<descriptor>`/`<field>`/`<choice>` children. Namespace
//! prefixes on tag and attribute names are stripped lexically
//! (`BytesStart::local_name`), so a document using a namespaced dialect
//! parses the same as one without.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::meta::{Encoding, Field, Meta};

/// Parses a schema XML document, returning every `<type>` it declares as a
/// [`Meta`] record, in document order.
pub fn parse(document: &str) -> Result<Vec<Meta>, Error> {
    let mut reader = Reader::from_str(document);
    reader.trim_text(true);

    let mut metas = Vec::new();
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Eof => break,
            Event::Start(tag) if local_name(&tag) == "type" => {
                metas.push(parse_type(&mut reader, &tag)?);
            }
            Event::Empty(tag) if local_name(&tag) == "type" => {
                metas.push(build_type(&tag, Vec::new())?);
            }
            _ => {}
        }
    }
    Ok(metas)
}

/// One child element gathered from inside a `<type>...</type>` body.
enum Child {
    Encoding(Encoding),
    /// `(primary, numeric)`: `primary` is symbolic when the `<descriptor>`
    /// declared a `name` (numeric otherwise), and `numeric` carries the
    /// numeric half too when both `name` and `code` were given.
    Descriptor(Descriptor, Option<Descriptor>),
    Field(Field),
    Choice(String, String),
}

fn parse_type(reader: &mut Reader<&[u8]>, open: &BytesStart) -> Result<Meta, Error> {
    let mut children = Vec::new();
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::End(tag) if local_name(&tag) == "type" => break,
            Event::Eof => {
                return Err(Error::SchemaSyntax(
                    "unexpected end of document inside <type>".to_string(),
                ))
            }
            Event::Start(tag) | Event::Empty(tag) => {
                children.push(parse_child(&tag)?);
            }
            _ => {}
        }
    }
    build_type(open, children)
}

fn parse_child(tag: &BytesStart) -> Result<Child, Error> {
    match local_name(tag) {
        "encoding" => {
            let name = attr(tag, "name").unwrap_or_default();
            let category = attr(tag, "category").unwrap_or_else(|| "fixed".to_string());
            let code = attr(tag, "code")
                .ok_or_else(|| Error::SchemaSyntax("<encoding> missing code attribute".to_string()))?;
            let code = parse_hex_u8(&code)?;
            let width = attr(tag, "width")
                .map(|w| w.parse::<usize>())
                .transpose()
                .map_err(|_| Error::SchemaSyntax("<encoding> width must be an integer".to_string()))?
                .unwrap_or(0);
            let _ = name;
            Ok(Child::Encoding(Encoding {
                category,
                code,
                width,
            }))
        }
        "descriptor" => {
            let name = attr(tag, "name");
            let code = attr(tag, "code");
            let numeric = code.as_deref().map(parse_descriptor_code).transpose()?;
            let (descriptor, extra_numeric) = match (name, numeric) {
                (Some(name), numeric) => (
                    Descriptor::Symbolic(crate::primitives::Symbol::from(name)),
                    numeric,
                ),
                (None, Some(numeric)) => (numeric, None),
                (None, None) => {
                    return Err(Error::SchemaSyntax(
                        "<descriptor> must have a name or code attribute".to_string(),
                    ))
                }
            };
            Ok(Child::Descriptor(descriptor, extra_numeric))
        }
        "field" => {
            let name = attr(tag, "name")
                .ok_or_else(|| Error::SchemaSyntax("<field> missing name attribute".to_string()))?;
            let type_name = attr(tag, "type").unwrap_or_else(|| "*".to_string());
            let mandatory = attr(tag, "mandatory")
                .map(|v| v == "true")
                .unwrap_or(false);
            let multiple = attr(tag, "multiple").map(|v| v == "true").unwrap_or(false);
            let requires = attr(tag, "requires")
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            Ok(Child::Field(Field::new(
                name, type_name, mandatory, multiple, requires,
            )))
        }
        "choice" => {
            let name = attr(tag, "name")
                .ok_or_else(|| Error::SchemaSyntax("<choice> missing name attribute".to_string()))?;
            let value = attr(tag, "value")
                .ok_or_else(|| Error::SchemaSyntax("<choice> missing value attribute".to_string()))?;
            Ok(Child::Choice(name, value))
        }
        other => Err(Error::SchemaSyntax(format!(
            "unexpected child element <{other}> inside <type>"
        ))),
    }
}

fn build_type(open: &BytesStart, children: Vec<Child>) -> Result<Meta, Error> {
    let name = attr(open, "name")
        .ok_or_else(|| Error::SchemaSyntax("<type> missing name attribute".to_string()))?;
    let class = attr(open, "class").unwrap_or_else(|| "primitive".to_string());
    let source = attr(open, "source").unwrap_or_default();
    let provides = attr(open, "provides")
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let mut encodings = Vec::new();
    let mut descriptor = None;
    let mut numeric_descriptor = None;
    let mut fields = Vec::new();
    let mut choices = indexmap::IndexMap::new();
    for child in children {
        match child {
            Child::Encoding(e) => encodings.push(e),
            Child::Descriptor(d, n) => {
                descriptor = Some(d);
                numeric_descriptor = n;
            }
            Child::Field(f) => fields.push(f),
            Child::Choice(name, value) => {
                choices.insert(name, value);
            }
        }
    }

    let meta = match class.as_str() {
        "composite" => Meta::composite(name, descriptor, numeric_descriptor, fields, provides),
        "restricted" => {
            Meta::restricted(name, source, descriptor, numeric_descriptor, choices).with_provides(provides)
        }
        _ => Meta::primitive(name, source, encodings),
    };
    Ok(meta)
}

fn local_name(tag: &BytesStart) -> String {
    String::from_utf8_lossy(tag.local_name().as_ref()).into_owned()
}

fn attr(tag: &BytesStart, key: &str) -> Option<String> {
    tag.attributes().filter_map(Result::ok).find_map(|a| {
        let attr_name = String::from_utf8_lossy(a.key.local_name().as_ref()).into_owned();
        if attr_name == key {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

fn parse_hex_u8(text: &str) -> Result<u8, Error> {
    let trimmed = text.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(trimmed, 16)
        .map_err(|_| Error::SchemaSyntax(format!("invalid hex byte {text:?}")))
}

/// Parses a `domain:id` hex-pair descriptor code, e.g.
/// `"0x00000000:0x00000011"`.
fn parse_descriptor_code(text: &str) -> Result<Descriptor, Error> {
    let (domain, id) = text
        .split_once(':')
        .ok_or_else(|| Error::SchemaSyntax(format!("malformed descriptor code {text:?}")))?;
    let parse_u32 = |s: &str| -> Result<u32, Error> {
        let trimmed = s.trim().trim_start_matches("0x").trim_start_matches("0X");
        u32::from_str_radix(trimmed, 16)
            .map_err(|_| Error::SchemaSyntax(format!("invalid hex half in descriptor code {text:?}")))
    };
    Ok(Descriptor::from_domain_id(parse_u32(domain)?, parse_u32(id)?))
}

fn xml_err(err: quick_xml::Error) -> Error {
    Error::SchemaSyntax(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::TypeClass;

    #[test]
    fn parses_primitive_with_multiple_encodings() {
        let doc = r#"<amqp><section>
            <type name="uint" class="primitive">
                <encoding name="uint0" category="fixed" code="0x43" width="0"/>
                <encoding name="smalluint" category="fixed" code="0x52" width="1"/>
                <encoding name="uint" category="fixed" code="0x70" width="4"/>
            </type>
        </section></amqp>"#;
        let metas = parse(doc).unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].type_class(), TypeClass::Primitive);
        assert_eq!(metas[0].encodings().len(), 3);
    }

    #[test]
    fn parses_composite_with_fields_and_descriptor() {
        let doc = r#"<amqp><section>
            <type name="test:envelope:list" class="composite" source="list">
                <descriptor name="test:envelope:list" code="0x00000000:0x00000001"/>
                <field name="id" type="uint" mandatory="true"/>
                <field name="body" type="*" requires="body"/>
            </type>
        </section></amqp>"#;
        let metas = parse(doc).unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].type_class(), TypeClass::Composite);
        assert_eq!(metas[0].fields().len(), 2);
        assert!(metas[0].fields()[1].is_polymorphic());
        assert_eq!(
            metas[0].descriptor(),
            Some(&Descriptor::Symbolic(crate::primitives::Symbol::from(
                "test:envelope:list"
            )))
        );
        assert_eq!(
            metas[0].numeric_descriptor(),
            Some(&Descriptor::from_domain_id(0, 1))
        );
    }

    #[test]
    fn descriptor_with_name_and_code_registers_under_both_keys() {
        let doc = r#"<amqp><section>
            <type name="test:dual:list" class="composite" source="list">
                <descriptor name="test:dual:list" code="0x00000000:0x00000002"/>
                <field name="id" type="uint" mandatory="true"/>
            </type>
        </section></amqp>"#;
        let metas = parse(doc).unwrap();
        let mut registry = crate::registry::Registry::new();
        registry.register(metas.into_iter().next().unwrap());

        let by_symbolic = registry
            .get_by_descriptor(&Descriptor::Symbolic(crate::primitives::Symbol::from(
                "test:dual:list",
            )))
            .unwrap();
        let by_numeric = registry
            .get_by_descriptor(&Descriptor::from_domain_id(0, 2))
            .unwrap();
        assert_eq!(by_symbolic.type_name(), "test:dual:list");
        assert_eq!(by_numeric.type_name(), "test:dual:list");
    }

    #[test]
    fn parses_restricted_with_choices() {
        let doc = r#"<amqp><section>
            <type name="test:flag" class="restricted" source="ubyte">
                <choice name="on" value="1"/>
                <choice name="off" value="0"/>
            </type>
        </section></amqp>"#;
        let metas = parse(doc).unwrap();
        assert_eq!(metas[0].choices().get("on").map(String::as_str), Some("1"));
    }

    #[test]
    fn unknown_child_tag_is_a_schema_syntax_error() {
        let doc = r#"<amqp><section>
            <type name="broken" class="primitive">
                <nonsense/>
            </type>
        </section></amqp>"#;
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, Error::SchemaSyntax(_)));
    }
}
