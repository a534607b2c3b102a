use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::macros::{is_blankz, is_break, vecdeque_starts_with};
use crate::reader::{update_buffer, INPUT_BUFFER_SIZE, INPUT_RAW_BUFFER_SIZE};
use crate::{Encoding, Mark, Parser, ReaderError, ScalarStyle, ScannerError, SimpleKey, Token, TokenData};

/// The scanner structure.
///
/// Owns the raw and decoded input buffers and turns the character stream into
/// the token stream the parser consumes. Lives inside [`Parser`] rather than
/// being driven directly, except through [`yaml_parser_scan`].
#[non_exhaustive]
pub(crate) struct Scanner<'r> {
    /// Read handler.
    pub(crate) read_handler: Option<&'r mut dyn std::io::BufRead>,
    /// EOF flag.
    pub(crate) eof: bool,
    /// The working buffer.
    ///
    /// This always contains valid Unicode scalar values.
    pub(crate) buffer: VecDeque<char>,
    /// The number of unread characters in the buffer.
    pub(crate) unread: usize,
    /// The raw buffer.
    ///
    /// This is the raw unchecked input from the read handler (for example, it
    /// may be UTF-16 encoded).
    pub(crate) raw_buffer: VecDeque<u8>,
    /// The input encoding.
    pub(crate) encoding: Encoding,
    /// The offset of the current position (in bytes).
    pub(crate) offset: usize,
    /// The mark of the current position.
    pub(crate) mark: Mark,
    /// Have we started to scan the input stream?
    pub(crate) stream_start_produced: bool,
    /// Have we reached the end of the input stream?
    pub(crate) stream_end_produced: bool,
    /// The number of unclosed '[' and '{' indicators.
    pub(crate) flow_level: i32,
    /// The tokens queue.
    pub(crate) tokens: VecDeque<Token>,
    /// The number of tokens fetched from the queue.
    pub(crate) tokens_parsed: usize,
    /// Does the tokens queue contain a token ready for dequeueing.
    pub(crate) token_available: bool,
    /// The indentation levels stack.
    pub(crate) indents: Vec<i32>,
    /// The current indentation level.
    pub(crate) indent: i32,
    /// May a simple key occur at the current position?
    pub(crate) simple_key_allowed: bool,
    /// The stack of simple keys.
    pub(crate) simple_keys: Vec<SimpleKey>,
}

impl<'r> Scanner<'r> {
    pub(crate) fn new() -> Scanner<'r> {
        Scanner {
            read_handler: None,
            eof: false,
            buffer: VecDeque::with_capacity(INPUT_BUFFER_SIZE),
            unread: 0,
            raw_buffer: VecDeque::with_capacity(INPUT_RAW_BUFFER_SIZE),
            encoding: Encoding::Any,
            offset: 0,
            mark: Mark::default(),
            stream_start_produced: false,
            stream_end_produced: false,
            flow_level: 0,
            tokens: VecDeque::with_capacity(16),
            tokens_parsed: 0,
            token_available: false,
            indents: Vec::with_capacity(16),
            indent: 0,
            simple_key_allowed: false,
            simple_keys: Vec::with_capacity(16),
        }
    }

    /// Set a string input.
    pub(crate) fn set_input_string(&mut self, input: &'r mut &[u8]) {
        assert!(self.read_handler.is_none());
        self.read_handler = Some(input);
    }

    /// Set a generic input handler.
    pub(crate) fn set_input(&mut self, input: &'r mut dyn std::io::BufRead) {
        assert!(self.read_handler.is_none());
        self.read_handler = Some(input);
    }

    /// Set the source encoding.
    pub(crate) fn set_encoding(&mut self, encoding: Encoding) {
        assert_eq!(self.encoding, Encoding::Any);
        self.encoding = encoding;
    }

    /// Ensure the token queue has at least one token ready for dequeueing.
    pub(crate) fn fetch_more_tokens(&mut self) -> Result<(), ScannerError> {
        fetch_more_tokens(self)
    }
}

/// Scan the input stream and produce the next token.
///
/// Call the function subsequently to produce a sequence of tokens
/// corresponding to the input stream. The initial token has the type
/// [`TokenData::StreamStart`] while the ending token has the type
/// [`TokenData::StreamEnd`].
///
/// An application must not alternate the calls of [`yaml_parser_scan()`] with
/// the calls of [`Parser::parse()`] or [`Document::load()`](crate::Document::load).
/// Doing this will break the parser.
pub fn yaml_parser_scan(parser: &mut Parser) -> Result<Token, ScannerError> {
    scan_next_token(&mut parser.scanner)
}

fn CACHE(scanner: &mut Scanner, length: usize) -> Result<(), ReaderError> {
    if scanner.unread >= length {
        Ok(())
    } else {
        update_buffer(scanner, length)
    }
}

fn SKIP(scanner: &mut Scanner) {
    let popped = scanner.buffer.pop_front().expect("unexpected end of tokens");
    let width = popped.len_utf8();
    scanner.mark.index += width as u64;
    scanner.mark.column += 1;
    scanner.unread -= 1;
}

fn SKIP_LINE(scanner: &mut Scanner) {
    if vecdeque_starts_with(&scanner.buffer, &['\r', '\n']) {
        scanner.mark.index += 2;
        scanner.mark.column = 0;
        scanner.mark.line += 1;
        scanner.unread -= 2;
        scanner.buffer.drain(0..2);
    } else if let Some(front) = scanner.buffer.front().copied() {
        if is_break(front) {
            let width = front.len_utf8();
            scanner.mark.index += width as u64;
            scanner.mark.column = 0;
            scanner.mark.line += 1;
            scanner.unread -= 1;
            scanner.buffer.pop_front();
        }
    }
}

fn READ_STRING(scanner: &mut Scanner, string: &mut String) {
    if let Some(popped) = scanner.buffer.pop_front() {
        string.push(popped);
        scanner.mark.index = popped.len_utf8() as u64;
        scanner.mark.column += 1;
        scanner.unread -= 1;
    } else {
        panic!("unexpected end of input")
    }
}

fn READ_LINE_STRING(scanner: &mut Scanner, string: &mut String) {
    if vecdeque_starts_with(&scanner.buffer, &['\r', '\n']) {
        string.push('\n');
        scanner.buffer.drain(0..2);
        scanner.mark.index += 2;
        scanner.mark.column = 0;
        scanner.mark.line += 1;
        scanner.unread -= 2;
    } else {
        let Some(front) = scanner.buffer.front().copied() else {
            panic!("unexpected end of input");
        };
        if is_break(front) {
            scanner.buffer.pop_front();
            let char_len = front.len_utf8();
            if char_len == 3 {
                // libyaml preserves Unicode breaks in this case.
                string.push(front);
            } else {
                string.push('\n');
            }
            scanner.mark.index += char_len as u64;
            scanner.mark.column = 0;
            scanner.mark.line += 1;
            scanner.unread -= 1;
        }
    }
}

/// Produce the next token from the input stream.
///
/// The initial token has the type [`TokenData::StreamStart`] while the ending
/// token has the type [`TokenData::StreamEnd`].
///
/// An application must not alternate the calls of this function with the
/// calls of [`Parser::parse()`](crate::Parser::parse) or
/// [`Document::load()`](crate::Document::load). Doing this will break the
/// scanner.
fn scan_next_token(scanner: &mut Scanner) -> Result<Token, ScannerError> {
    if scanner.stream_end_produced {
        return Ok(Token {
            data: TokenData::StreamEnd,
            start_mark: scanner.mark,
            end_mark: scanner.mark,
        });
    }
    if !scanner.token_available {
        fetch_more_tokens(scanner)?;
    }
    if let Some(token) = scanner.tokens.pop_front() {
        scanner.token_available = false;
        scanner.tokens_parsed = scanner.tokens_parsed.wrapping_add(1);
        if let TokenData::StreamEnd = &token.data {
            scanner.stream_end_produced = true;
        }
        log::trace!(
            "scanned {:?} at line {} column {}",
            token.data,
            token.start_mark.line,
            token.start_mark.column
        );
        Ok(token)
    } else {
        unreachable!("no more tokens, but stream-end was not produced")
    }
}

fn set_scanner_error<T>(
    scanner: &mut Scanner,
    context: &'static str,
    context_mark: Mark,
    problem: &'static str,
) -> Result<T, ScannerError> {
    Err(ScannerError::Problem {
        context,
        context_mark,
        problem,
        problem_mark: scanner.mark,
    })
}

pub(crate) fn fetch_more_tokens(
    scanner: &mut Scanner,
) -> Result<(), ScannerError> {
    let mut need_more_tokens;
    loop {
        need_more_tokens = false;
        if scanner.tokens.is_empty() {
            need_more_tokens = true;
        } else {
            stale_simple_keys(scanner)?;
            for simple_key in &scanner.simple_keys {
                if simple_key.possible && simple_key.token_number == scanner.tokens_parsed {
                    need_more_tokens = true;
                    break;
                }
            }
        }
        if !need_more_tokens {
            break;
        }
        fetch_next_token(scanner)?;
    }
    scanner.token_available = true;
    Ok(())
}

fn fetch_next_token(scanner: &mut Scanner) -> Result<(), ScannerError> {
    CACHE(scanner, 1)?;
    if !scanner.stream_start_produced {
        fetch_stream_start(scanner);
        return Ok(());
    }
    scan_to_next_token(scanner)?;
    stale_simple_keys(scanner)?;
    unroll_indent(scanner, scanner.mark.column as i64);
    CACHE(scanner, 4)?;
    if IS_Z!(scanner.buffer) {
        return fetch_stream_end(scanner);
    }
    if scanner.mark.column == 0 && scanner.buffer[0] == '%' {
        return fetch_directive(scanner);
    }
    if scanner.mark.column == 0
        && CHECK_AT!(scanner.buffer, '-', 0)
        && CHECK_AT!(scanner.buffer, '-', 1)
        && CHECK_AT!(scanner.buffer, '-', 2)
        && is_blankz(scanner.buffer.get(3).copied())
    {
        return fetch_document_indicator(scanner, TokenData::DocumentStart);
    }
    if scanner.mark.column == 0
        && CHECK_AT!(scanner.buffer, '.', 0)
        && CHECK_AT!(scanner.buffer, '.', 1)
        && CHECK_AT!(scanner.buffer, '.', 2)
        && is_blankz(scanner.buffer.get(3).copied())
    {
        return fetch_document_indicator(scanner, TokenData::DocumentEnd);
    }
    if CHECK!(scanner.buffer, '[') {
        return fetch_flow_collection_start(scanner, TokenData::FlowSequenceStart);
    }
    if CHECK!(scanner.buffer, '{') {
        return fetch_flow_collection_start(scanner, TokenData::FlowMappingStart);
    }
    if CHECK!(scanner.buffer, ']') {
        return fetch_flow_collection_end(scanner, TokenData::FlowSequenceEnd);
    }
    if CHECK!(scanner.buffer, '}') {
        return fetch_flow_collection_end(scanner, TokenData::FlowMappingEnd);
    }
    if CHECK!(scanner.buffer, ',') {
        return fetch_flow_entry(scanner);
    }
    if CHECK!(scanner.buffer, '-') && IS_BLANKZ_AT!(scanner.buffer, 1) {
        return fetch_block_entry(scanner);
    }
    if CHECK!(scanner.buffer, '?') && (scanner.flow_level != 0 || IS_BLANKZ_AT!(scanner.buffer, 1)) {
        return fetch_key(scanner);
    }
    if CHECK!(scanner.buffer, ':') && (scanner.flow_level != 0 || IS_BLANKZ_AT!(scanner.buffer, 1)) {
        return fetch_value(scanner);
    }
    if CHECK!(scanner.buffer, '*') {
        return fetch_anchor(scanner, true);
    }
    if CHECK!(scanner.buffer, '&') {
        return fetch_anchor(scanner, false);
    }
    if CHECK!(scanner.buffer, '!') {
        return fetch_tag(scanner);
    }
    if CHECK!(scanner.buffer, '|') && scanner.flow_level == 0 {
        return fetch_block_scalar(scanner, true);
    }
    if CHECK!(scanner.buffer, '>') && scanner.flow_level == 0 {
        return fetch_block_scalar(scanner, false);
    }
    if CHECK!(scanner.buffer, '\'') {
        return fetch_flow_scalar(scanner, true);
    }
    if CHECK!(scanner.buffer, '"') {
        return fetch_flow_scalar(scanner, false);
    }
    if !(IS_BLANKZ!(scanner.buffer)
        || CHECK!(scanner.buffer, '-')
        || CHECK!(scanner.buffer, '?')
        || CHECK!(scanner.buffer, ':')
        || CHECK!(scanner.buffer, ',')
        || CHECK!(scanner.buffer, '[')
        || CHECK!(scanner.buffer, ']')
        || CHECK!(scanner.buffer, '{')
        || CHECK!(scanner.buffer, '}')
        || CHECK!(scanner.buffer, '#')
        || CHECK!(scanner.buffer, '&')
        || CHECK!(scanner.buffer, '*')
        || CHECK!(scanner.buffer, '!')
        || CHECK!(scanner.buffer, '|')
        || CHECK!(scanner.buffer, '>')
        || CHECK!(scanner.buffer, '\'')
        || CHECK!(scanner.buffer, '"')
        || CHECK!(scanner.buffer, '%')
        || CHECK!(scanner.buffer, '@')
        || CHECK!(scanner.buffer, '`'))
        || CHECK!(scanner.buffer, '-') && !IS_BLANK_AT!(scanner.buffer, 1)
        || scanner.flow_level == 0
            && (CHECK!(scanner.buffer, '?') || CHECK!(scanner.buffer, ':'))
            && !IS_BLANKZ_AT!(scanner.buffer, 1)
    {
        return fetch_plain_scalar(scanner);
    }
    set_scanner_error(
        scanner,
        "while scanning for the next token",
        scanner.mark,
        "found character that cannot start any token",
    )
}

fn stale_simple_keys(scanner: &mut Scanner) -> Result<(), ScannerError> {
    for simple_key in &mut scanner.simple_keys {
        let mark = simple_key.mark;
        if simple_key.possible
            && (mark.line < scanner.mark.line || mark.index.wrapping_add(1024) < scanner.mark.index)
        {
            if simple_key.required {
                return set_scanner_error(
                    scanner,
                    "while scanning a simple key",
                    mark,
                    "could not find expected ':'",
                );
            }
            simple_key.possible = false;
        }
    }

    Ok(())
}

fn save_simple_key(scanner: &mut Scanner) -> Result<(), ScannerError> {
    let required =
        scanner.flow_level == 0 && scanner.indent as i64 == scanner.mark.column as i64;
    if scanner.simple_key_allowed {
        let simple_key = SimpleKey {
            possible: true,
            required,
            token_number: scanner
                .tokens_parsed
                .wrapping_add(scanner.tokens.len() as usize),
            mark: scanner.mark,
        };
        remove_simple_key(scanner)?;
        *scanner.simple_keys.last_mut().unwrap() = simple_key;
    }
    Ok(())
}

fn remove_simple_key(scanner: &mut Scanner) -> Result<(), ScannerError> {
    let simple_key: &mut SimpleKey = scanner.simple_keys.last_mut().unwrap();
    if simple_key.possible {
        let mark = simple_key.mark;
        if simple_key.required {
            return set_scanner_error(
                scanner,
                "while scanning a simple key",
                mark,
                "could not find expected ':'",
            );
        }
    }
    simple_key.possible = false;
    Ok(())
}

fn increase_flow_level(scanner: &mut Scanner) -> Result<(), ScannerError> {
    let empty_simple_key = SimpleKey {
        possible: false,
        required: false,
        token_number: 0,
        mark: Mark {
            index: 0,
            line: 0,
            column: 0,
        },
    };
    scanner.simple_keys.push(empty_simple_key);
    assert!(
        !(scanner.flow_level == i32::MAX),
        "scanner.flow_level integer overflow"
    );
    scanner.flow_level += 1;
    Ok(())
}

fn decrease_flow_level(scanner: &mut Scanner) {
    if scanner.flow_level != 0 {
        scanner.flow_level -= 1;
        let _ = scanner.simple_keys.pop();
    }
}

fn roll_indent(
    scanner: &mut Scanner,
    column: i64,
    number: i64,
    data: TokenData,
    mark: Mark,
) -> Result<(), ScannerError> {
    if scanner.flow_level != 0 {
        return Ok(());
    }
    if (scanner.indent as i64) < column {
        scanner.indents.push(scanner.indent);
        assert!(
            !(column > i64::from(i32::MAX)),
            "integer overflow"
        );
        scanner.indent = column as i32;
        let token = Token {
            data,
            start_mark: mark,
            end_mark: mark,
        };
        if number == -1_i64 {
            scanner.tokens.push_back(token);
        } else {
            scanner.tokens.insert(
                (number as usize).wrapping_sub(scanner.tokens_parsed) as usize,
                token,
            );
        }
    }
    Ok(())
}

fn unroll_indent(scanner: &mut Scanner, column: i64) {
    if scanner.flow_level != 0 {
        return;
    }
    while scanner.indent as i64 > column {
        let token = Token {
            data: TokenData::BlockEnd,
            start_mark: scanner.mark,
            end_mark: scanner.mark,
        };
        scanner.tokens.push_back(token);
        scanner.indent = scanner.indents.pop().unwrap();
    }
}

fn fetch_stream_start(scanner: &mut Scanner) {
    let simple_key = SimpleKey {
        possible: false,
        required: false,
        token_number: 0,
        mark: Mark {
            index: 0,
            line: 0,
            column: 0,
        },
    };
    scanner.indent = -1;
    scanner.simple_keys.push(simple_key);
    scanner.simple_key_allowed = true;
    scanner.stream_start_produced = true;
    let token = Token {
        data: TokenData::StreamStart {
            encoding: scanner.encoding,
        },
        start_mark: scanner.mark,
        end_mark: scanner.mark,
    };
    scanner.tokens.push_back(token);
}

fn fetch_stream_end(scanner: &mut Scanner) -> Result<(), ScannerError> {
    if scanner.mark.column != 0 {
        scanner.mark.column = 0;
        scanner.mark.line = scanner.mark.line.wrapping_add(1);
    }
    unroll_indent(scanner, -1_i64);
    remove_simple_key(scanner)?;
    scanner.simple_key_allowed = false;
    let token = Token {
        data: TokenData::StreamEnd,
        start_mark: scanner.mark,
        end_mark: scanner.mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_directive(scanner: &mut Scanner) -> Result<(), ScannerError> {
    unroll_indent(scanner, -1_i64);
    remove_simple_key(scanner)?;
    scanner.simple_key_allowed = false;
    let token = scan_directive(scanner)?;
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_document_indicator(
    scanner: &mut Scanner,
    data: TokenData,
) -> Result<(), ScannerError> {
    unroll_indent(scanner, -1_i64);
    remove_simple_key(scanner)?;
    scanner.simple_key_allowed = false;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    SKIP(scanner);
    SKIP(scanner);
    let end_mark: Mark = scanner.mark;

    let token = Token {
        data,
        start_mark,
        end_mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_flow_collection_start(
    scanner: &mut Scanner,
    data: TokenData,
) -> Result<(), ScannerError> {
    save_simple_key(scanner)?;
    increase_flow_level(scanner)?;
    scanner.simple_key_allowed = true;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    let end_mark: Mark = scanner.mark;
    let token = Token {
        data,
        start_mark,
        end_mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_flow_collection_end(
    scanner: &mut Scanner,
    data: TokenData,
) -> Result<(), ScannerError> {
    remove_simple_key(scanner)?;
    decrease_flow_level(scanner);
    scanner.simple_key_allowed = false;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    let end_mark: Mark = scanner.mark;
    let token = Token {
        data,
        start_mark,
        end_mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_flow_entry(scanner: &mut Scanner) -> Result<(), ScannerError> {
    remove_simple_key(scanner)?;
    scanner.simple_key_allowed = true;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    let end_mark: Mark = scanner.mark;
    let token = Token {
        data: TokenData::FlowEntry,
        start_mark,
        end_mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_block_entry(scanner: &mut Scanner) -> Result<(), ScannerError> {
    if scanner.flow_level == 0 {
        if !scanner.simple_key_allowed {
            return set_scanner_error(
                scanner,
                "",
                scanner.mark,
                "block sequence entries are not allowed in this context",
            );
        }
        roll_indent(
            scanner,
            scanner.mark.column as i64,
            -1_i64,
            TokenData::BlockSequenceStart,
            scanner.mark,
        )?;
    }
    remove_simple_key(scanner)?;
    scanner.simple_key_allowed = true;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    let end_mark: Mark = scanner.mark;
    let token = Token {
        data: TokenData::BlockEntry,
        start_mark,
        end_mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_key(scanner: &mut Scanner) -> Result<(), ScannerError> {
    if scanner.flow_level == 0 {
        if !scanner.simple_key_allowed {
            return set_scanner_error(
                scanner,
                "",
                scanner.mark,
                "mapping keys are not allowed in this context",
            );
        }
        roll_indent(
            scanner,
            scanner.mark.column as i64,
            -1_i64,
            TokenData::BlockMappingStart,
            scanner.mark,
        )?;
    }
    remove_simple_key(scanner)?;
    scanner.simple_key_allowed = scanner.flow_level == 0;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    let end_mark: Mark = scanner.mark;
    let token = Token {
        data: TokenData::Key,
        start_mark,
        end_mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_value(scanner: &mut Scanner) -> Result<(), ScannerError> {
    let simple_key: &mut SimpleKey = scanner.simple_keys.last_mut().unwrap();
    if simple_key.possible {
        let token = Token {
            data: TokenData::Key,
            start_mark: simple_key.mark,
            end_mark: simple_key.mark,
        };
        scanner.tokens.insert(
            simple_key.token_number.wrapping_sub(scanner.tokens_parsed) as usize,
            token,
        );
        let mark_column = simple_key.mark.column as i64;
        let token_number = simple_key.token_number as i64;
        let mark = simple_key.mark;
        simple_key.possible = false;
        roll_indent(
            scanner,
            mark_column,
            token_number,
            TokenData::BlockMappingStart,
            mark,
        )?;
        scanner.simple_key_allowed = false;
    } else {
        if scanner.flow_level == 0 {
            if !scanner.simple_key_allowed {
                return set_scanner_error(
                    scanner,
                    "",
                    scanner.mark,
                    "mapping values are not allowed in this context",
                );
            }
            roll_indent(
                scanner,
                scanner.mark.column as i64,
                -1_i64,
                TokenData::BlockMappingStart,
                scanner.mark,
            )?;
        }
        scanner.simple_key_allowed = scanner.flow_level == 0;
    }
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    let end_mark: Mark = scanner.mark;
    let token = Token {
        data: TokenData::Value,
        start_mark,
        end_mark,
    };
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_anchor(
    scanner: &mut Scanner,
    fetch_alias_instead_of_anchor: bool,
) -> Result<(), ScannerError> {
    save_simple_key(scanner)?;
    scanner.simple_key_allowed = false;
    let token = scan_anchor(scanner, fetch_alias_instead_of_anchor)?;
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_tag(scanner: &mut Scanner) -> Result<(), ScannerError> {
    save_simple_key(scanner)?;
    scanner.simple_key_allowed = false;
    let token = scan_tag(scanner)?;
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_block_scalar(
    scanner: &mut Scanner,
    literal: bool,
) -> Result<(), ScannerError> {
    remove_simple_key(scanner)?;
    scanner.simple_key_allowed = true;
    let token = scan_block_scalar(scanner, literal)?;
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_flow_scalar(
    scanner: &mut Scanner,
    single: bool,
) -> Result<(), ScannerError> {
    save_simple_key(scanner)?;
    scanner.simple_key_allowed = false;
    let token = scan_flow_scalar(scanner, single)?;
    scanner.tokens.push_back(token);
    Ok(())
}

fn fetch_plain_scalar(scanner: &mut Scanner) -> Result<(), ScannerError> {
    save_simple_key(scanner)?;
    scanner.simple_key_allowed = false;
    let token = scan_plain_scalar(scanner)?;
    scanner.tokens.push_back(token);
    Ok(())
}

fn scan_to_next_token(scanner: &mut Scanner) -> Result<(), ScannerError> {
    loop {
        CACHE(scanner, 1)?;
        if scanner.mark.column == 0 && IS_BOM!(scanner.buffer) {
            SKIP(scanner);
        }
        CACHE(scanner, 1)?;
        while CHECK!(scanner.buffer, ' ')
            || (scanner.flow_level != 0 || !scanner.simple_key_allowed) && CHECK!(scanner.buffer, '\t')
        {
            SKIP(scanner);
            CACHE(scanner, 1)?;
        }
        if CHECK!(scanner.buffer, '#') {
            while !IS_BREAKZ!(scanner.buffer) {
                SKIP(scanner);
                CACHE(scanner, 1)?;
            }
        }
        if !IS_BREAK!(scanner.buffer) {
            break;
        }
        CACHE(scanner, 2)?;
        SKIP_LINE(scanner);
        if scanner.flow_level == 0 {
            scanner.simple_key_allowed = true;
        }
    }
    Ok(())
}

fn scan_directive(scanner: &mut Scanner) -> Result<Token, ScannerError> {
    let end_mark: Mark;
    let mut major: i32 = 0;
    let mut minor: i32 = 0;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    let name = scan_directive_name(scanner, start_mark)?;
    let token = if name == "YAML" {
        scan_version_directive_value(scanner, start_mark, &mut major, &mut minor)?;

        end_mark = scanner.mark;
        Token {
            data: TokenData::VersionDirective { major, minor },
            start_mark,
            end_mark,
        }
    } else if name == "TAG" {
        let (handle, prefix) = scan_tag_directive_value(scanner, start_mark)?;
        end_mark = scanner.mark;
        Token {
            data: TokenData::TagDirective { handle, prefix },
            start_mark,
            end_mark,
        }
    } else {
        return set_scanner_error(
            scanner,
            "while scanning a directive",
            start_mark,
            "found unknown directive name",
        );
    };
    CACHE(scanner, 1)?;
    loop {
        if !IS_BLANK!(scanner.buffer) {
            break;
        }
        SKIP(scanner);
        CACHE(scanner, 1)?;
    }

    if CHECK!(scanner.buffer, '#') {
        loop {
            if IS_BREAKZ!(scanner.buffer) {
                break;
            }
            SKIP(scanner);
            CACHE(scanner, 1)?;
        }
    }

    if !IS_BREAKZ!(scanner.buffer) {
        set_scanner_error(
            scanner,
            "while scanning a directive",
            start_mark,
            "did not find expected comment or line break",
        )
    } else {
        if IS_BREAK!(scanner.buffer) {
            CACHE(scanner, 2)?;
            SKIP_LINE(scanner);
        }
        Ok(token)
    }
}

fn scan_directive_name(
    scanner: &mut Scanner,
    start_mark: Mark,
) -> Result<String, ScannerError> {
    let mut string = String::new();
    CACHE(scanner, 1)?;

    loop {
        if !IS_ALPHA!(scanner.buffer) {
            break;
        }
        READ_STRING(scanner, &mut string);
        CACHE(scanner, 1)?;
    }

    if string.is_empty() {
        set_scanner_error(
            scanner,
            "while scanning a directive",
            start_mark,
            "could not find expected directive name",
        )
    } else if !IS_BLANKZ!(scanner.buffer) {
        set_scanner_error(
            scanner,
            "while scanning a directive",
            start_mark,
            "found unexpected non-alphabetical character",
        )
    } else {
        Ok(string)
    }
}

fn scan_version_directive_value(
    scanner: &mut Scanner,
    start_mark: Mark,
    major: &mut i32,
    minor: &mut i32,
) -> Result<(), ScannerError> {
    CACHE(scanner, 1)?;
    while IS_BLANK!(scanner.buffer) {
        SKIP(scanner);
        CACHE(scanner, 1)?;
    }
    scan_version_directive_number(scanner, start_mark, major)?;
    if !CHECK!(scanner.buffer, '.') {
        return set_scanner_error(
            scanner,
            "while scanning a %YAML directive",
            start_mark,
            "did not find expected digit or '.' character",
        );
    }
    SKIP(scanner);
    scan_version_directive_number(scanner, start_mark, minor)
}

const MAX_NUMBER_LENGTH: usize = 9;

fn scan_version_directive_number(
    scanner: &mut Scanner,
    start_mark: Mark,
    number: &mut i32,
) -> Result<(), ScannerError> {
    let mut value: i32 = 0;
    let mut length: usize = 0;
    CACHE(scanner, 1)?;
    while IS_DIGIT!(scanner.buffer) {
        length = length.wrapping_add(1);
        if length > MAX_NUMBER_LENGTH {
            return set_scanner_error(
                scanner,
                "while scanning a %YAML directive",
                start_mark,
                "found extremely long version number",
            );
        }
        value = value
            .wrapping_mul(10)
            .wrapping_add(AS_DIGIT!(scanner.buffer) as i32);
        SKIP(scanner);
        CACHE(scanner, 1)?;
    }
    if length == 0 {
        return set_scanner_error(
            scanner,
            "while scanning a %YAML directive",
            start_mark,
            "did not find expected version number",
        );
    }
    *number = value;
    Ok(())
}

// Returns (handle, prefix)
fn scan_tag_directive_value(
    scanner: &mut Scanner,
    start_mark: Mark,
) -> Result<(String, String), ScannerError> {
    CACHE(scanner, 1)?;

    loop {
        if IS_BLANK!(scanner.buffer) {
            SKIP(scanner);
            CACHE(scanner, 1)?;
        } else {
            let handle_value = scan_tag_handle(scanner, true, start_mark)?;

            CACHE(scanner, 1)?;

            if !IS_BLANK!(scanner.buffer) {
                return set_scanner_error(
                    scanner,
                    "while scanning a %TAG directive",
                    start_mark,
                    "did not find expected whitespace",
                );
            } else {
                while IS_BLANK!(scanner.buffer) {
                    SKIP(scanner);
                    CACHE(scanner, 1)?;
                }

                let prefix_value = scan_tag_uri(scanner, true, true, None, start_mark)?;
                CACHE(scanner, 1)?;

                if !IS_BLANKZ!(scanner.buffer) {
                    return set_scanner_error(
                        scanner,
                        "while scanning a %TAG directive",
                        start_mark,
                        "did not find expected whitespace or line break",
                    );
                } else {
                    return Ok((handle_value, prefix_value));
                }
            }
        }
    }
}

fn scan_anchor(
    scanner: &mut Scanner,
    scan_alias_instead_of_anchor: bool,
) -> Result<Token, ScannerError> {
    let mut length: i32 = 0;

    let mut string = String::new();
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    CACHE(scanner, 1)?;

    loop {
        if !IS_ALPHA!(scanner.buffer) {
            break;
        }
        READ_STRING(scanner, &mut string);
        CACHE(scanner, 1)?;
        length += 1;
    }
    let end_mark: Mark = scanner.mark;
    if length == 0
        || !(IS_BLANKZ!(scanner.buffer)
            || CHECK!(scanner.buffer, '?')
            || CHECK!(scanner.buffer, ':')
            || CHECK!(scanner.buffer, ',')
            || CHECK!(scanner.buffer, ']')
            || CHECK!(scanner.buffer, '}')
            || CHECK!(scanner.buffer, '%')
            || CHECK!(scanner.buffer, '@')
            || CHECK!(scanner.buffer, '`'))
    {
        set_scanner_error(
            scanner,
            if !scan_alias_instead_of_anchor {
                "while scanning an anchor"
            } else {
                "while scanning an alias"
            },
            start_mark,
            "did not find expected alphabetic or numeric character",
        )
    } else {
        Ok(Token {
            data: if scan_alias_instead_of_anchor {
                TokenData::Alias { value: string }
            } else {
                TokenData::Anchor { value: string }
            },
            start_mark,
            end_mark,
        })
    }
}

fn scan_tag(scanner: &mut Scanner) -> Result<Token, ScannerError> {
    let mut handle;
    let mut suffix;

    let start_mark: Mark = scanner.mark;

    CACHE(scanner, 2)?;

    if CHECK_AT!(scanner.buffer, '<', 1) {
        handle = String::new();
        SKIP(scanner);
        SKIP(scanner);
        suffix = scan_tag_uri(scanner, true, false, None, start_mark)?;

        if !CHECK!(scanner.buffer, '>') {
            return set_scanner_error(
                scanner,
                "while scanning a tag",
                start_mark,
                "did not find the expected '>'",
            );
        } else {
            SKIP(scanner);
        }
    } else {
        handle = scan_tag_handle(scanner, false, start_mark)?;
        if handle.starts_with('!') && handle.len() > 1 && handle.ends_with('!') {
            suffix = scan_tag_uri(scanner, false, false, None, start_mark)?;
        } else {
            suffix = scan_tag_uri(scanner, false, false, Some(&handle), start_mark)?;
            handle = String::from("!");
            if suffix.is_empty() {
                core::mem::swap(&mut handle, &mut suffix);
            }
        }
    }

    CACHE(scanner, 1)?;
    if !IS_BLANKZ!(scanner.buffer) {
        if scanner.flow_level == 0 || !CHECK!(scanner.buffer, ',') {
            return set_scanner_error(
                scanner,
                "while scanning a tag",
                start_mark,
                "did not find expected whitespace or line break",
            );
        } else {
            panic!("TODO: What is expected here?");
        }
    }

    let end_mark: Mark = scanner.mark;
    Ok(Token {
        data: TokenData::Tag { handle, suffix },
        start_mark,
        end_mark,
    })
}

fn scan_tag_handle(
    scanner: &mut Scanner,
    directive: bool,
    start_mark: Mark,
) -> Result<String, ScannerError> {
    let mut string = String::new();
    CACHE(scanner, 1)?;

    if !CHECK!(scanner.buffer, '!') {
        return set_scanner_error(
            scanner,
            if directive {
                "while scanning a tag directive"
            } else {
                "while scanning a tag"
            },
            start_mark,
            "did not find expected '!'",
        );
    }

    READ_STRING(scanner, &mut string);
    CACHE(scanner, 1)?;
    loop {
        if !IS_ALPHA!(scanner.buffer) {
            break;
        }
        READ_STRING(scanner, &mut string);
        CACHE(scanner, 1)?;
    }
    if CHECK!(scanner.buffer, '!') {
        READ_STRING(scanner, &mut string);
    } else if directive && string != "!" {
        return set_scanner_error(
            scanner,
            "while parsing a tag directive",
            start_mark,
            "did not find expected '!'",
        );
    }
    Ok(string)
}

fn scan_tag_uri(
    scanner: &mut Scanner,
    uri_char: bool,
    directive: bool,
    head: Option<&str>,
    start_mark: Mark,
) -> Result<String, ScannerError> {
    let head = head.unwrap_or("");
    let mut length = head.len();
    let mut string = String::new();

    if length > 1 {
        string = String::from(&head[1..]);
    }
    CACHE(scanner, 1)?;

    while IS_ALPHA!(scanner.buffer)
        || CHECK!(scanner.buffer, ';')
        || CHECK!(scanner.buffer, '/')
        || CHECK!(scanner.buffer, '?')
        || CHECK!(scanner.buffer, ':')
        || CHECK!(scanner.buffer, '@')
        || CHECK!(scanner.buffer, '&')
        || CHECK!(scanner.buffer, '=')
        || CHECK!(scanner.buffer, '+')
        || CHECK!(scanner.buffer, '$')
        || CHECK!(scanner.buffer, '.')
        || CHECK!(scanner.buffer, '%')
        || CHECK!(scanner.buffer, '!')
        || CHECK!(scanner.buffer, '~')
        || CHECK!(scanner.buffer, '*')
        || CHECK!(scanner.buffer, '\'')
        || CHECK!(scanner.buffer, '(')
        || CHECK!(scanner.buffer, ')')
        || uri_char
            && (CHECK!(scanner.buffer, ',')
                || CHECK!(scanner.buffer, '[')
                || CHECK!(scanner.buffer, ']'))
    {
        if CHECK!(scanner.buffer, '%') {
            scan_uri_escapes(scanner, directive, start_mark, &mut string)?;
        } else {
            READ_STRING(scanner, &mut string);
        }
        length = length.wrapping_add(1);
        CACHE(scanner, 1)?;
    }
    if length == 0 {
        set_scanner_error(
            scanner,
            if directive {
                "while parsing a %TAG directive"
            } else {
                "while parsing a tag"
            },
            start_mark,
            "did not find expected tag URI",
        )
    } else {
        Ok(string)
    }
}

fn scan_uri_escapes(
    scanner: &mut Scanner,
    directive: bool,
    start_mark: Mark,
    string: &mut String,
) -> Result<(), ScannerError> {
    let mut width: i32 = 0;
    loop {
        CACHE(scanner, 3)?;
        if !(CHECK!(scanner.buffer, '%')
            && IS_HEX_AT!(scanner.buffer, 1)
            && IS_HEX_AT!(scanner.buffer, 2))
        {
            return set_scanner_error(
                scanner,
                if directive {
                    "while parsing a %TAG directive"
                } else {
                    "while parsing a tag"
                },
                start_mark,
                "did not find URI escaped octet",
            );
        }
        let octet: u8 =
            ((AS_HEX_AT!(scanner.buffer, 1) << 4) + AS_HEX_AT!(scanner.buffer, 2)) as u8;
        if width == 0 {
            width = if octet & 0x80 == 0 {
                1
            } else if octet & 0xE0 == 0xC0 {
                2
            } else if octet & 0xF0 == 0xE0 {
                3
            } else if octet & 0xF8 == 0xF0 {
                4
            } else {
                0
            };
            // TODO: Something is fishy here, why isn't `width` being used?
            if width == 0 {
                return set_scanner_error(
                    scanner,
                    if directive {
                        "while parsing a %TAG directive"
                    } else {
                        "while parsing a tag"
                    },
                    start_mark,
                    "found an incorrect leading UTF-8 octet",
                );
            }
        } else if octet & 0xC0 != 0x80 {
            return set_scanner_error(
                scanner,
                if directive {
                    "while parsing a %TAG directive"
                } else {
                    "while parsing a tag"
                },
                start_mark,
                "found an incorrect trailing UTF-8 octet",
            );
        }
        string.push(char::from_u32(octet as _).expect("invalid Unicode"));
        SKIP(scanner);
        SKIP(scanner);
        SKIP(scanner);
        width -= 1;
        if !(width != 0) {
            break;
        }
    }
    Ok(())
}

fn scan_block_scalar(scanner: &mut Scanner, literal: bool) -> Result<Token, ScannerError> {
    let mut end_mark: Mark;
    let mut string = String::new();
    let mut leading_break = String::new();
    let mut trailing_breaks = String::new();
    let mut chomping: i32 = 0;
    let mut increment: i32 = 0;
    let mut indent: i32 = 0;
    let mut leading_blank: i32 = 0;
    let mut trailing_blank: i32;
    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    CACHE(scanner, 1)?;

    if CHECK!(scanner.buffer, '+') || CHECK!(scanner.buffer, '-') {
        chomping = if CHECK!(scanner.buffer, '+') { 1 } else { -1 };
        SKIP(scanner);
        CACHE(scanner, 1)?;
        if IS_DIGIT!(scanner.buffer) {
            if CHECK!(scanner.buffer, '0') {
                return set_scanner_error(
                    scanner,
                    "while scanning a block scalar",
                    start_mark,
                    "found an indentation indicator equal to 0",
                );
            } else {
                increment = AS_DIGIT!(scanner.buffer) as i32;
                SKIP(scanner);
            }
        }
    } else if IS_DIGIT!(scanner.buffer) {
        if CHECK!(scanner.buffer, '0') {
            return set_scanner_error(
                scanner,
                "while scanning a block scalar",
                start_mark,
                "found an indentation indicator equal to 0",
            );
        } else {
            increment = AS_DIGIT!(scanner.buffer) as i32;
            SKIP(scanner);
            CACHE(scanner, 1)?;
            if CHECK!(scanner.buffer, '+') || CHECK!(scanner.buffer, '-') {
                chomping = if CHECK!(scanner.buffer, '+') { 1 } else { -1 };
                SKIP(scanner);
            }
        }
    }

    CACHE(scanner, 1)?;
    loop {
        if !IS_BLANK!(scanner.buffer) {
            break;
        }
        SKIP(scanner);
        CACHE(scanner, 1)?;
    }

    if CHECK!(scanner.buffer, '#') {
        loop {
            if IS_BREAKZ!(scanner.buffer) {
                break;
            }
            SKIP(scanner);
            CACHE(scanner, 1)?;
        }
    }

    if !IS_BREAKZ!(scanner.buffer) {
        return set_scanner_error(
            scanner,
            "while scanning a block scalar",
            start_mark,
            "did not find expected comment or line break",
        );
    }

    if IS_BREAK!(scanner.buffer) {
        CACHE(scanner, 2)?;
        SKIP_LINE(scanner);
    }

    end_mark = scanner.mark;
    if increment != 0 {
        indent = if scanner.indent >= 0 {
            scanner.indent + increment
        } else {
            increment
        };
    }
    scan_block_scalar_breaks(
        scanner,
        &mut indent,
        &mut trailing_breaks,
        start_mark,
        &mut end_mark,
    )?;

    CACHE(scanner, 1)?;

    loop {
        if !(scanner.mark.column as i32 == indent && !IS_Z!(scanner.buffer)) {
            break;
        }
        trailing_blank = IS_BLANK!(scanner.buffer) as i32;
        if !literal && leading_break.starts_with('\n') && leading_blank == 0 && trailing_blank == 0
        {
            if trailing_breaks.is_empty() {
                string.push(' ');
            }
            leading_break.clear();
        } else {
            string.push_str(&leading_break);
            leading_break.clear();
        }
        string.push_str(&trailing_breaks);
        trailing_breaks.clear();
        leading_blank = IS_BLANK!(scanner.buffer) as i32;
        while !IS_BREAKZ!(scanner.buffer) {
            READ_STRING(scanner, &mut string);
            CACHE(scanner, 1)?;
        }
        CACHE(scanner, 2)?;
        READ_LINE_STRING(scanner, &mut leading_break);
        scan_block_scalar_breaks(
            scanner,
            &mut indent,
            &mut trailing_breaks,
            start_mark,
            &mut end_mark,
        )?;
    }

    if chomping != -1 {
        string.push_str(&leading_break);
    }

    if chomping == 1 {
        string.push_str(&trailing_breaks);
    }

    Ok(Token {
        data: TokenData::Scalar {
            value: string,
            style: if literal {
                ScalarStyle::Literal
            } else {
                ScalarStyle::Folded
            },
        },
        start_mark,
        end_mark,
    })
}

fn scan_block_scalar_breaks(
    scanner: &mut Scanner,
    indent: &mut i32,
    breaks: &mut String,
    start_mark: Mark,
    end_mark: &mut Mark,
) -> Result<(), ScannerError> {
    let mut max_indent: i32 = 0;
    *end_mark = scanner.mark;
    loop {
        CACHE(scanner, 1)?;
        while (*indent == 0 || (scanner.mark.column as i32) < *indent)
            && IS_SPACE!(scanner.buffer)
        {
            SKIP(scanner);
            CACHE(scanner, 1)?;
        }
        if scanner.mark.column as i32 > max_indent {
            max_indent = scanner.mark.column as i32;
        }
        if (*indent == 0 || (scanner.mark.column as i32) < *indent) && IS_TAB!(scanner.buffer)
        {
            return set_scanner_error(
                scanner,
                "while scanning a block scalar",
                start_mark,
                "found a tab character where an indentation space is expected",
            );
        }
        if !IS_BREAK!(scanner.buffer) {
            break;
        }
        CACHE(scanner, 2)?;
        READ_LINE_STRING(scanner, breaks);
        *end_mark = scanner.mark;
    }
    if *indent == 0 {
        *indent = max_indent;
        if *indent < scanner.indent + 1 {
            *indent = scanner.indent + 1;
        }
        if *indent < 1 {
            *indent = 1;
        }
    }
    Ok(())
}

fn scan_flow_scalar(scanner: &mut Scanner, single: bool) -> Result<Token, ScannerError> {
    let mut string = String::new();
    let mut leading_break = String::new();
    let mut trailing_breaks = String::new();
    let mut whitespaces = String::new();
    let mut leading_blanks;

    let start_mark: Mark = scanner.mark;
    SKIP(scanner);
    loop {
        CACHE(scanner, 4)?;

        if scanner.mark.column == 0
            && (CHECK_AT!(scanner.buffer, '-', 0)
                && CHECK_AT!(scanner.buffer, '-', 1)
                && CHECK_AT!(scanner.buffer, '-', 2)
                || CHECK_AT!(scanner.buffer, '.', 0)
                    && CHECK_AT!(scanner.buffer, '.', 1)
                    && CHECK_AT!(scanner.buffer, '.', 2))
            && IS_BLANKZ_AT!(scanner.buffer, 3)
        {
            return set_scanner_error(
                scanner,
                "while scanning a quoted scalar",
                start_mark,
                "found unexpected document indicator",
            );
        } else if IS_Z!(scanner.buffer) {
            return set_scanner_error(
                scanner,
                "while scanning a quoted scalar",
                start_mark,
                "found unexpected end of stream",
            );
        } else {
            CACHE(scanner, 2)?;
            leading_blanks = false;
            while !IS_BLANKZ!(scanner.buffer) {
                if single && CHECK_AT!(scanner.buffer, '\'', 0) && CHECK_AT!(scanner.buffer, '\'', 1)
                {
                    string.push('\'');
                    SKIP(scanner);
                    SKIP(scanner);
                } else {
                    if CHECK!(scanner.buffer, if single { '\'' } else { '"' }) {
                        break;
                    }
                    if !single && CHECK!(scanner.buffer, '\\') && IS_BREAK_AT!(scanner.buffer, 1) {
                        CACHE(scanner, 3)?;
                        SKIP(scanner);
                        SKIP_LINE(scanner);
                        leading_blanks = true;
                        break;
                    } else if !single && CHECK!(scanner.buffer, '\\') {
                        let mut code_length: usize = 0;
                        match scanner.buffer.get(1).copied().unwrap() {
                            '0' => {
                                string.push('\0');
                            }
                            'a' => {
                                string.push('\x07');
                            }
                            'b' => {
                                string.push('\x08');
                            }
                            't' | '\t' => {
                                string.push('\t');
                            }
                            'n' => {
                                string.push('\n');
                            }
                            'v' => {
                                string.push('\x0B');
                            }
                            'f' => {
                                string.push('\x0C');
                            }
                            'r' => {
                                string.push('\r');
                            }
                            'e' => {
                                string.push('\x1B');
                            }
                            ' ' => {
                                string.push(' ');
                            }
                            '"' => {
                                string.push('"');
                            }
                            '/' => {
                                string.push('/');
                            }
                            '\\' => {
                                string.push('\\');
                            }
                            // NEL (#x85)
                            'N' => {
                                string.push('\u{0085}');
                            }
                            // #xA0
                            '_' => {
                                string.push('\u{00a0}');
                                // string.push('\xC2');
                                // string.push('\xA0');
                            }
                            // LS (#x2028)
                            'L' => {
                                string.push('\u{2028}');
                                // string.push('\xE2');
                                // string.push('\x80');
                                // string.push('\xA8');
                            }
                            // PS (#x2029)
                            'P' => {
                                string.push('\u{2029}');
                                // string.push('\xE2');
                                // string.push('\x80');
                                // string.push('\xA9');
                            }
                            'x' => {
                                code_length = 2;
                            }
                            'u' => {
                                code_length = 4;
                            }
                            'U' => {
                                code_length = 8;
                            }
                            _ => {
                                return set_scanner_error(
                                    scanner,
                                    "while parsing a quoted scalar",
                                    start_mark,
                                    "found unknown escape character",
                                );
                            }
                        }
                        SKIP(scanner);
                        SKIP(scanner);
                        if code_length != 0 {
                            let mut value: u32 = 0;
                            let mut k: usize;
                            CACHE(scanner, code_length)?;
                            k = 0;
                            while k < code_length {
                                if !IS_HEX_AT!(scanner.buffer, k as usize) {
                                    return set_scanner_error(
                                        scanner,
                                        "while parsing a quoted scalar",
                                        start_mark,
                                        "did not find expected hexdecimal number",
                                    );
                                } else {
                                    value = (value << 4)
                                        .wrapping_add(AS_HEX_AT!(scanner.buffer, k as usize));
                                    k = k.wrapping_add(1);
                                }
                            }
                            if let Some(ch) = char::from_u32(value) {
                                string.push(ch);
                            } else {
                                return set_scanner_error(
                                    scanner,
                                    "while parsing a quoted scalar",
                                    start_mark,
                                    "found invalid Unicode character escape code",
                                );
                            }

                            k = 0;
                            while k < code_length {
                                SKIP(scanner);
                                k = k.wrapping_add(1);
                            }
                        }
                    } else {
                        READ_STRING(scanner, &mut string);
                    }
                }
                CACHE(scanner, 2)?;
            }
            CACHE(scanner, 1)?;
            if CHECK!(scanner.buffer, if single { '\'' } else { '"' }) {
                break;
            }
            CACHE(scanner, 1)?;
            while IS_BLANK!(scanner.buffer) || IS_BREAK!(scanner.buffer) {
                if IS_BLANK!(scanner.buffer) {
                    if !leading_blanks {
                        READ_STRING(scanner, &mut whitespaces);
                    } else {
                        SKIP(scanner);
                    }
                } else {
                    CACHE(scanner, 2)?;
                    if !leading_blanks {
                        whitespaces.clear();
                        READ_LINE_STRING(scanner, &mut leading_break);
                        leading_blanks = true;
                    } else {
                        READ_LINE_STRING(scanner, &mut trailing_breaks);
                    }
                }
                CACHE(scanner, 1)?;
            }
            if leading_blanks {
                if leading_break.starts_with('\n') {
                    if trailing_breaks.is_empty() {
                        string.push(' ');
                    } else {
                        string.push_str(&trailing_breaks);
                        trailing_breaks.clear();
                    }
                    leading_break.clear();
                } else {
                    string.push_str(&leading_break);
                    string.push_str(&trailing_breaks);
                    leading_break.clear();
                    trailing_breaks.clear();
                }
            } else {
                string.push_str(&whitespaces);
                whitespaces.clear();
            }
        }
    }

    SKIP(scanner);
    let end_mark: Mark = scanner.mark;
    Ok(Token {
        data: TokenData::Scalar {
            value: string,
            style: if single {
                ScalarStyle::SingleQuoted
            } else {
                ScalarStyle::DoubleQuoted
            },
        },
        start_mark,
        end_mark,
    })
}

fn scan_plain_scalar(scanner: &mut Scanner) -> Result<Token, ScannerError> {
    let mut end_mark: Mark;
    let mut string = String::new();
    let mut leading_break = String::new();
    let mut trailing_breaks = String::new();
    let mut whitespaces = String::new();
    let mut leading_blanks = false;
    let indent: i32 = scanner.indent + 1;
    end_mark = scanner.mark;
    let start_mark: Mark = end_mark;
    loop {
        CACHE(scanner, 4)?;
        if scanner.mark.column == 0
            && (CHECK_AT!(scanner.buffer, '-', 0)
                && CHECK_AT!(scanner.buffer, '-', 1)
                && CHECK_AT!(scanner.buffer, '-', 2)
                || CHECK_AT!(scanner.buffer, '.', 0)
                    && CHECK_AT!(scanner.buffer, '.', 1)
                    && CHECK_AT!(scanner.buffer, '.', 2))
            && IS_BLANKZ_AT!(scanner.buffer, 3)
        {
            break;
        }
        if CHECK!(scanner.buffer, '#') {
            break;
        }
        while !IS_BLANKZ!(scanner.buffer) {
            if scanner.flow_level != 0
                && CHECK!(scanner.buffer, ':')
                && (CHECK_AT!(scanner.buffer, ',', 1)
                    || CHECK_AT!(scanner.buffer, '?', 1)
                    || CHECK_AT!(scanner.buffer, '[', 1)
                    || CHECK_AT!(scanner.buffer, ']', 1)
                    || CHECK_AT!(scanner.buffer, '{', 1)
                    || CHECK_AT!(scanner.buffer, '}', 1))
            {
                return set_scanner_error(
                    scanner,
                    "while scanning a plain scalar",
                    start_mark,
                    "found unexpected ':'",
                );
            } else {
                if CHECK!(scanner.buffer, ':') && IS_BLANKZ_AT!(scanner.buffer, 1)
                    || scanner.flow_level != 0
                        && (CHECK!(scanner.buffer, ',')
                            || CHECK!(scanner.buffer, '[')
                            || CHECK!(scanner.buffer, ']')
                            || CHECK!(scanner.buffer, '{')
                            || CHECK!(scanner.buffer, '}'))
                {
                    break;
                }
                if leading_blanks || !whitespaces.is_empty() {
                    if leading_blanks {
                        if leading_break.starts_with('\n') {
                            if trailing_breaks.is_empty() {
                                string.push(' ');
                            } else {
                                string.push_str(&trailing_breaks);
                                trailing_breaks.clear();
                            }
                            leading_break.clear();
                        } else {
                            string.push_str(&leading_break);
                            string.push_str(&trailing_breaks);
                            leading_break.clear();
                            trailing_breaks.clear();
                        }
                        leading_blanks = false;
                    } else {
                        string.push_str(&whitespaces);
                        whitespaces.clear();
                    }
                }
                READ_STRING(scanner, &mut string);
                end_mark = scanner.mark;
                CACHE(scanner, 2)?;
            }
        }
        if !(IS_BLANK!(scanner.buffer) || IS_BREAK!(scanner.buffer)) {
            break;
        }
        CACHE(scanner, 1)?;

        while IS_BLANK!(scanner.buffer) || IS_BREAK!(scanner.buffer) {
            if IS_BLANK!(scanner.buffer) {
                if leading_blanks
                    && (scanner.mark.column as i32) < indent
                    && IS_TAB!(scanner.buffer)
                {
                    return set_scanner_error(
                        scanner,
                        "while scanning a plain scalar",
                        start_mark,
                        "found a tab character that violates indentation",
                    );
                } else if !leading_blanks {
                    READ_STRING(scanner, &mut whitespaces);
                } else {
                    SKIP(scanner);
                }
            } else {
                CACHE(scanner, 2)?;

                if !leading_blanks {
                    whitespaces.clear();
                    READ_LINE_STRING(scanner, &mut leading_break);
                    leading_blanks = true;
                } else {
                    READ_LINE_STRING(scanner, &mut trailing_breaks);
                }
            }
            CACHE(scanner, 1)?;
        }
        if scanner.flow_level == 0 && (scanner.mark.column as i32) < indent {
            break;
        }
    }

    let token = Token {
        data: TokenData::Scalar {
            value: string,
            style: ScalarStyle::Plain,
        },
        start_mark,
        end_mark,
    };
    if leading_blanks {
        scanner.simple_key_allowed = true;
    }

    Ok(token)
}
