/*!
 * Property tests over span validation and interchange files
 */

use proptest::prelude::*;

use annoflow::document::{Annotation, AnnotationType, AnnotationValue, Document};
use annoflow::output::{dump, xmi};

/// Byte offsets of every character boundary of a text, end included
fn boundaries(text: &str) -> Vec<usize> {
    text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect()
}

fn value_for(kind: u8, label: &str, begin: usize, end: usize) -> AnnotationValue {
    match kind % 6 {
        0 => AnnotationValue::Token,
        1 => AnnotationValue::Sentence,
        2 => AnnotationValue::Lemma { value: label.to_string() },
        3 => AnnotationValue::PartOfSpeech {
            tag: "NN".to_string(),
            coarse: label.to_string(),
        },
        4 => AnnotationValue::Dependency {
            relation: label.to_string(),
            governor_begin: begin,
            governor_end: end,
        },
        _ => AnnotationValue::NamedEntity { value: label.to_string() },
    }
}

proptest! {
    /// Test that a span is accepted exactly when it selects a substring
    #[test]
    fn test_checkSpan_shouldAgreeWithStrGet(text in "\\PC{0,20}", begin in 0usize..64, end in 0usize..64) {
        let doc = Document::new(text.clone(), "en");

        prop_assert_eq!(doc.check_span(begin, end).is_ok(), text.get(begin..end).is_some());
    }

    /// Test that a layer is added completely or not at all
    #[test]
    fn test_addLayer_shouldBeAtomic(
        text in "[a-zé ]{0,20}",
        spans in prop::collection::vec((0usize..30, 0usize..30), 0..8),
    ) {
        let mut doc = Document::new(text.clone(), "en");
        let all_valid = spans.iter().all(|&(b, e)| text.get(b..e).is_some());
        let annotations = spans
            .iter()
            .map(|&(b, e)| Annotation::new(b, e, AnnotationValue::Token))
            .collect();

        let result = doc.add_layer(&[AnnotationType::Token], annotations);

        prop_assert_eq!(result.is_ok(), all_valid);
        prop_assert_eq!(doc.len(), if all_valid { spans.len() } else { 0 });
        prop_assert_eq!(doc.has_layer(AnnotationType::Token), all_valid);
    }

    /// Test that any valid document survives the interchange format and
    /// dumps identically afterwards
    #[test]
    fn test_xmiRoundTrip_shouldPreserveDocumentAndDump(
        text in "[a-zA-Z0-9 .,'\"&<>\n\ríñ]{0,40}",
        title in proptest::option::of("[a-zA-Z &<>\"]{0,12}"),
        picks in prop::collection::vec((any::<usize>(), any::<usize>(), any::<u8>(), "[a-z&<>\"]{1,6}"), 0..10),
    ) {
        let offsets = boundaries(&text);
        let mut doc = Document::new(text, "en").with_id("prop-doc");
        if let Some(title) = title {
            doc = doc.with_title(title);
        }

        for (a, b, kind, label) in &picks {
            let x = offsets[a % offsets.len()];
            let y = offsets[b % offsets.len()];
            let (begin, end) = (x.min(y), x.max(y));
            doc.add_annotation(Annotation::new(begin, end, value_for(*kind, label, begin, end))).unwrap();
        }
        doc.mark_layer(AnnotationType::Token);

        let restored = xmi::from_xml_str(&xmi::to_xml_string(&doc)).unwrap();

        prop_assert_eq!(dump::dump_to_string(&restored), dump::dump_to_string(&doc));
        prop_assert_eq!(restored, doc);
    }
}
