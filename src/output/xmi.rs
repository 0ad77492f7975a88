/*!
 * XML interchange files.
 *
 * A document is persisted as one `.xmi` file:
 *
 * ```xml
 * <?xml version="1.0" encoding="UTF-8"?>
 * <document id="2465939" language="en" title="..." uri="...">
 *   <layers>
 *     <layer name="token"/>
 *   </layers>
 *   <text>...</text>
 *   <annotations>
 *     <annotation type="pos" begin="0" end="8" tag="NNP" coarse="PROPN"/>
 *   </annotations>
 * </document>
 * ```
 *
 * Reading a written file gives back an equal document.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::document::{Annotation, AnnotationType, AnnotationValue, Document, DocumentMetadata};
use crate::errors::{AppError, IoError};
use crate::file_utils::{FileManager, PatternSet};

/// Path reported for documents parsed from memory
const IN_MEMORY: &str = "<memory>";

/// Serialize a document to its interchange form.
pub fn to_xml_string(document: &Document) -> String {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    // writing into a Vec cannot fail
    let _ = write_events(&mut writer, document);
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

fn write_events(writer: &mut Writer<Vec<u8>>, document: &Document) -> quick_xml::Result<()> {
    let metadata = document.metadata();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("document");
    root.push_attribute(("id", metadata.id.as_str()));
    root.push_attribute(("language", metadata.language.as_str()));
    if let Some(title) = &metadata.title {
        root.push_attribute(("title", title.as_str()));
    }
    if let Some(uri) = &metadata.uri {
        root.push_attribute(("uri", uri.as_str()));
    }
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("layers")))?;
    for layer in document.layers() {
        let mut element = BytesStart::new("layer");
        element.push_attribute(("name", layer.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("layers")))?;

    if document.text().is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("text")))?;
    } else {
        // carriage returns survive only as character references
        let escaped = escape(document.text()).replace('\r', "&#13;");
        writer.write_event(Event::Start(BytesStart::new("text")))?;
        writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
        writer.write_event(Event::End(BytesEnd::new("text")))?;
    }

    writer.write_event(Event::Start(BytesStart::new("annotations")))?;
    for annotation in document.annotations() {
        let begin = annotation.begin.to_string();
        let end = annotation.end.to_string();
        let attributes = annotation.value.attributes();

        let mut element = BytesStart::new("annotation");
        element.push_attribute(("type", annotation.annotation_type().as_str()));
        element.push_attribute(("begin", begin.as_str()));
        element.push_attribute(("end", end.as_str()));
        for (key, value) in &attributes {
            element.push_attribute((*key, value.as_str()));
        }
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("annotations")))?;

    writer.write_event(Event::End(BytesEnd::new("document")))
}

/// Parse a document from its interchange form.
pub fn from_xml_str(xml: &str) -> Result<Document, IoError> {
    parse(xml).map_err(|message| IoError::Format {
        path: PathBuf::from(IN_MEMORY),
        message,
    })
}

/// Attributes of an element as owned name/value pairs
fn attributes(element: &BytesStart<'_>) -> Result<BTreeMap<String, String>, String> {
    let mut result = BTreeMap::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        result.insert(key, value.into_owned());
    }
    Ok(result)
}

fn offset(attributes: &BTreeMap<String, String>, name: &str) -> Result<usize, String> {
    attributes
        .get(name)
        .ok_or_else(|| format!("annotation is missing '{}'", name))?
        .parse()
        .map_err(|e| format!("annotation '{}' is not an offset: {}", name, e))
}

fn parse_annotation(attributes: &BTreeMap<String, String>) -> Result<Annotation, String> {
    let annotation_type: AnnotationType = attributes
        .get("type")
        .ok_or_else(|| "annotation is missing 'type'".to_string())?
        .parse()?;

    let value = AnnotationValue::from_attributes(annotation_type, |name| attributes.get(name).map(String::as_str))?;
    Ok(Annotation::new(offset(attributes, "begin")?, offset(attributes, "end")?, value))
}

fn parse(xml: &str) -> Result<Document, String> {
    let mut reader = Reader::from_str(xml);

    let mut metadata: Option<DocumentMetadata> = None;
    let mut layers: Vec<AnnotationType> = Vec::new();
    let mut annotations: Vec<Annotation> = Vec::new();
    let mut text = String::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("error at position {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(element) | Event::Empty(element) if element.name().as_ref() == b"document" => {
                let mut attrs = attributes(&element)?;
                let id = attrs.remove("id").ok_or("document is missing 'id'")?;
                let language = attrs.remove("language").ok_or("document is missing 'language'")?;
                metadata = Some(DocumentMetadata {
                    id,
                    language,
                    title: attrs.remove("title"),
                    uri: attrs.remove("uri"),
                });
            }
            Event::Start(element) if element.name().as_ref() == b"text" => in_text = true,
            Event::End(element) if element.name().as_ref() == b"text" => in_text = false,
            Event::Empty(element) if element.name().as_ref() == b"layer" => {
                let attrs = attributes(&element)?;
                let name = attrs.get("name").ok_or("layer is missing 'name'")?;
                layers.push(name.parse()?);
            }
            Event::Empty(element) | Event::Start(element) if element.name().as_ref() == b"annotation" => {
                annotations.push(parse_annotation(&attributes(&element)?)?);
            }
            Event::Text(content) if in_text => {
                text.push_str(&content.unescape().map_err(|e| e.to_string())?);
            }
            Event::CData(content) if in_text => {
                text.push_str(std::str::from_utf8(&content).map_err(|e| e.to_string())?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let metadata = metadata.ok_or("missing <document> element")?;
    let mut document = Document::with_metadata(text, metadata);
    for annotation in annotations {
        document.add_annotation(annotation).map_err(|e| e.to_string())?;
    }
    for layer in layers {
        document.mark_layer(layer);
    }

    Ok(document)
}

/// Write a document to `<output_dir>/<sanitized id>.xmi` and return the path.
pub fn write_document<P: AsRef<Path>>(document: &Document, output_dir: P) -> Result<PathBuf, IoError> {
    let output_dir = output_dir.as_ref();
    FileManager::ensure_dir(output_dir)?;

    let path = FileManager::output_path(output_dir, document.id());
    fs::write(&path, to_xml_string(document)).map_err(|source| IoError::Write {
        path: path.clone(),
        source,
    })?;

    debug!("Wrote {} annotations to {:?}", document.len(), path);
    Ok(path)
}

/// Read one interchange file.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document, IoError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&xml).map_err(|message| IoError::Format {
        path: path.to_path_buf(),
        message,
    })
}

/// Read every file under `source_dir` selected by `patterns`, in order of
/// relative path.
pub fn read_collection<P: AsRef<Path>, S: AsRef<str>>(
    source_dir: P,
    patterns: &[S],
) -> Result<Vec<Document>, AppError> {
    let source_dir = source_dir.as_ref();
    let patterns = PatternSet::parse(patterns)?;

    let files = FileManager::find_matching(source_dir, &patterns)?;
    debug!("Found {} interchange files in {:?}", files.len(), source_dir);

    let documents = files
        .iter()
        .map(read_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(documents)
}
