/*!
 * Console dump of annotated documents.
 *
 * The dump is deterministic: a header with the document metadata, then one
 * section per annotation type in order of first appearance, one annotation
 * per line.
 */

use std::io::{self, Write};

use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};

/// Longest covered text shown before truncation, in characters
const MAX_COVERED_CHARS: usize = 60;

/// Write the full dump of one document.
pub fn write_dump<W: Write>(writer: &mut W, document: &Document) -> io::Result<()> {
    let metadata = document.metadata();

    writeln!(writer, "======== Document {} ========", metadata.id)?;
    writeln!(writer, "Title:    {}", metadata.title.as_deref().unwrap_or("-"))?;
    writeln!(writer, "URI:      {}", metadata.uri.as_deref().unwrap_or("-"))?;
    writeln!(writer, "Language: {}", metadata.language)?;
    writeln!(writer, "Text:     {} bytes", document.text().len())?;

    let layers: Vec<&str> = document.layers().map(|t| t.as_str()).collect();
    writeln!(
        writer,
        "Layers:   {}",
        if layers.is_empty() { "-".to_string() } else { layers.join(", ") }
    )?;

    for annotation_type in document.annotation_types() {
        let annotations = document.annotations_of_type(annotation_type);
        writeln!(
            writer,
            "-------- {} ({}) --------",
            annotation_type.display_name(),
            annotations.clone().count()
        )?;
        for annotation in annotations {
            writeln!(writer, "{}", format_annotation(document, annotation))?;
        }
    }

    writeln!(writer, "======== End of document {} ========", metadata.id)
}

/// Dump several documents in order, separated by a blank line.
pub fn dump_collection<W: Write>(writer: &mut W, documents: &[Document]) -> io::Result<()> {
    for (index, document) in documents.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        write_dump(writer, document)?;
    }
    Ok(())
}

/// Dump of one document as a string
pub fn dump_to_string(document: &Document) -> String {
    let mut buffer = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_dump(&mut buffer, document);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Print every paragraph, then every named entity with its category.
pub fn write_highlights<W: Write>(writer: &mut W, document: &Document) -> io::Result<()> {
    for paragraph in document.annotations_of_type(AnnotationType::Paragraph) {
        writeln!(writer, "Paragraph: {}", document.covered_text(paragraph))?;
    }

    for entity in document.annotations_of_type(AnnotationType::NamedEntity) {
        if let AnnotationValue::NamedEntity { value } = &entity.value {
            writeln!(writer, "Found NEs: {}, {}", value, document.covered_text(entity))?;
        }
    }

    Ok(())
}

/// `[begin, end) "covered" key=value ...`
fn format_annotation(document: &Document, annotation: &Annotation) -> String {
    let mut line = format!(
        "  [{}, {}) \"{}\"",
        annotation.begin,
        annotation.end,
        escape_covered(document.covered_text(annotation))
    );

    for (key, value) in annotation.value.attributes() {
        line.push_str(&format!(" {}={}", key, value));
    }

    line
}

fn escape_covered(text: &str) -> String {
    let mut escaped = String::new();
    for (count, c) in text.chars().enumerate() {
        if count == MAX_COVERED_CHARS {
            escaped.push_str("...");
            break;
        }
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            c => escaped.push(c),
        }
    }
    escaped
}
