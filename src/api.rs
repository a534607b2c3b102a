use alloc::vec::Vec;

use crate::{Break, ComposerError, Document, Emitter, Encoding, Parser};

/// Initialize a parser.
pub fn yaml_parser_new<'r>() -> Parser<'r> {
    Parser::new()
}

/// Reset the parser state.
pub fn yaml_parser_reset(parser: &mut Parser) {
    parser.reset();
}

/// Set a string input.
pub fn yaml_parser_set_input_string<'r>(parser: &mut Parser<'r>, input: &'r mut &[u8]) {
    parser.set_input_string(input);
}

/// Set a generic input handler.
pub fn yaml_parser_set_input<'r>(parser: &mut Parser<'r>, input: &'r mut dyn std::io::BufRead) {
    parser.set_input(input);
}

/// Set the source encoding.
pub fn yaml_parser_set_encoding(parser: &mut Parser, encoding: Encoding) {
    parser.set_encoding(encoding);
}

/// Set the maximum nesting depth the parser will accept before failing with
/// a parser error.
pub fn yaml_parser_set_max_nest_level(parser: &mut Parser, max_nest_level: i32) {
    parser.set_max_nest_level(max_nest_level);
}

/// Parse the input stream and produce the next YAML document.
///
/// Call this function subsequently to produce a sequence of documents
/// constituting the input stream.
pub fn yaml_parser_load(parser: &mut Parser) -> Result<Document, ComposerError> {
    Document::load(parser)
}

/// Create an emitter.
pub fn yaml_emitter_new<'w>() -> Emitter<'w> {
    Emitter::new()
}

/// Reset the emitter state.
pub fn yaml_emitter_reset(emitter: &mut Emitter) {
    *emitter = Emitter::new();
}

/// Set a string output.
///
/// The emitter will write the output characters to the `output` buffer.
pub fn yaml_emitter_set_output_string<'w>(emitter: &mut Emitter<'w>, output: &'w mut Vec<u8>) {
    assert!(emitter.write_handler.is_none());
    if emitter.encoding == Encoding::Any {
        yaml_emitter_set_encoding(emitter, Encoding::Utf8);
    } else if emitter.encoding != Encoding::Utf8 {
        panic!("cannot output UTF-16 to String")
    }
    output.clear();
    emitter.write_handler = Some(output);
}

/// Set a generic output handler.
pub fn yaml_emitter_set_output<'w>(emitter: &mut Emitter<'w>, handler: &'w mut dyn std::io::Write) {
    assert!(emitter.write_handler.is_none());
    emitter.write_handler = Some(handler);
}

/// Set the output encoding.
pub fn yaml_emitter_set_encoding(emitter: &mut Emitter, encoding: Encoding) {
    assert_eq!(emitter.encoding, Encoding::Any);
    emitter.encoding = encoding;
}

/// Set if the output should be in the "canonical" format as in the YAML
/// specification.
pub fn yaml_emitter_set_canonical(emitter: &mut Emitter, canonical: bool) {
    emitter.canonical = canonical;
}

/// Set the indentation increment.
pub fn yaml_emitter_set_indent(emitter: &mut Emitter, indent: i32) {
    emitter.best_indent = if 1 < indent && indent < 10 { indent } else { 2 };
}

/// Set the preferred line width. -1 means unlimited.
pub fn yaml_emitter_set_width(emitter: &mut Emitter, width: i32) {
    emitter.best_width = if width >= 0 { width } else { -1 };
}

/// Set if unescaped non-ASCII characters are allowed.
pub fn yaml_emitter_set_unicode(emitter: &mut Emitter, unicode: bool) {
    emitter.unicode = unicode;
}

/// Set the preferred line break.
pub fn yaml_emitter_set_break(emitter: &mut Emitter, line_break: Break) {
    emitter.line_break = line_break;
}
