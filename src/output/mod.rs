/*!
 * Output of annotated documents.
 *
 * - `dump`: human-readable console listing and the paragraph/entity highlights
 * - `xmi`: the XML interchange files written to and read from a directory
 */

pub mod dump;
pub mod xmi;

pub use dump::{dump_collection, dump_to_string, write_dump, write_highlights};
pub use xmi::{from_xml_str, read_collection, read_document, to_xml_string, write_document};
