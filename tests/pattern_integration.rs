//! Integration tests for compiling schemas and matching text
//!
//! These tests cover the public matching surface:
//! - Scalar, optional and nested fields
//! - Position markers
//! - Repeated matching with limits
//! - Compile-time rejection of bad schemas
//! - Sharing a compiled pattern across threads

use restructure::{
    compile, must_compile, CompileError, Descriptor, Pattern, Pos, Schema, SchemaBuilder,
    Submatch,
};
use std::sync::Arc;

// ============================================================================
// Schemas
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
struct DotName {
    dot: String,
    name: String,
}

impl Schema for DotName {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("DotName")
            .scalar("dot", r"\.", |v| &mut v.dot)
            .scalar("name", r"\w+", |v| &mut v.name)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct DotExpr {
    head: String,
    tail: Option<DotName>,
}

impl Schema for DotExpr {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("DotExpr")
            .separator("^")
            .scalar("head", r"\w+", |v| &mut v.head)
            .optional("tail", "?", |v| &mut v.tail)
            .separator("$")
            .build()
    }
}

#[derive(Debug, Default)]
struct Url {
    scheme: String,
    host: String,
}

impl Schema for Url {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Url")
            .separator("^")
            .scalar("scheme", "[[:alpha:]]+", |v| &mut v.scheme)
            .separator("://")
            .scalar("host", ".*", |v| &mut v.host)
            .separator("$")
            .build()
    }
}

#[derive(Debug, Default)]
struct NullableUrl {
    scheme: Option<String>,
    host: Option<String>,
}

impl Schema for NullableUrl {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("NullableUrl")
            .separator("^")
            .scalar("scheme", "[[:alpha:]]+", |v| &mut v.scheme)
            .separator("://")
            .scalar("host", ".*", |v| &mut v.host)
            .separator("$")
            .build()
    }
}

#[derive(Debug, Default)]
struct Word {
    word: Submatch,
}

impl Schema for Word {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Word")
            .scalar("word", r"\w+", |v| &mut v.word)
            .build()
    }
}

#[derive(Debug, Default)]
struct Bracketed {
    begin: Pos,
    word: String,
    end: Pos,
}

impl Schema for Bracketed {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Bracketed")
            .pos("begin", |v| &mut v.begin)
            .scalar("word", r"\w+", |v| &mut v.word)
            .pos("end", |v| &mut v.end)
            .build()
    }
}

#[derive(Debug, Default)]
struct DotNamePos {
    begin: Pos,
    dot: String,
    middle: Pos,
    name: String,
    end: Pos,
}

impl Schema for DotNamePos {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("DotNamePos")
            .pos("begin", |v| &mut v.begin)
            .scalar("dot", r"\.", |v| &mut v.dot)
            .pos("middle", |v| &mut v.middle)
            .scalar("name", r"\w+", |v| &mut v.name)
            .pos("end", |v| &mut v.end)
            .build()
    }
}

#[derive(Debug, Default)]
struct DotExprPos {
    begin: Pos,
    head: String,
    middle: Pos,
    tail: Option<DotNamePos>,
    end: Pos,
}

impl Schema for DotExprPos {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("DotExprPos")
            .pos("begin", |v| &mut v.begin)
            .separator("^")
            .scalar("head", r"\w+", |v| &mut v.head)
            .pos("middle", |v| &mut v.middle)
            .optional("tail", "?", |v| &mut v.tail)
            .separator("$")
            .pos("end", |v| &mut v.end)
            .build()
    }
}

#[derive(Debug, Default)]
struct Degenerate {
    x: Pos,
    y: Pos,
}

impl Schema for Degenerate {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Degenerate")
            .pos("x", |v| &mut v.x)
            .pos("y", |v| &mut v.y)
            .build()
    }
}

#[derive(Debug, Default)]
struct DotNameRegion {
    dot: Option<Submatch>,
    name: Option<Submatch>,
}

impl Schema for DotNameRegion {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("DotNameRegion")
            .scalar("dot", r"\.", |v| &mut v.dot)
            .scalar("name", r"\w+", |v| &mut v.name)
            .build()
    }
}

#[derive(Debug, Default)]
struct DotExprRegion {
    head: Submatch,
    tail: Option<DotNameRegion>,
}

impl Schema for DotExprRegion {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("DotExprRegion")
            .separator("^")
            .scalar("head", r"\w+", |v| &mut v.head)
            .optional("tail", "?", |v| &mut v.tail)
            .separator("$")
            .build()
    }
}

#[derive(Debug, Default)]
struct Nothing {
    x: String,
}

impl Schema for Nothing {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Nothing")
            .scalar("x", "", |v| &mut v.x)
            .build()
    }
}

#[derive(Debug, Default)]
struct HasSubcaptures {
    name: String,
}

impl Schema for HasSubcaptures {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("HasSubcaptures")
            .scalar("name", "a(bc)?d", |v| &mut v.name)
            .build()
    }
}

#[derive(Debug, Default)]
struct Malformed {
    x: String,
}

impl Schema for Malformed {
    fn descriptor() -> Descriptor {
        SchemaBuilder::<Self>::new("Malformed")
            .scalar("x", "(unclosed", |v| &mut v.x)
            .build()
    }
}

fn assert_submatch(expected: &str, begin: usize, end: usize, actual: &Submatch) {
    assert_eq!(actual.as_str(), Some(expected));
    assert_eq!(actual.begin, begin);
    assert_eq!(actual.end, end);
}

// ============================================================================
// Optional Nested Fields
// ============================================================================

#[test]
fn test_dot_expr_with_tail() {
    let pattern = Pattern::<DotExpr>::compile().unwrap();
    let mut v = DotExpr::default();

    assert!(pattern.find(&mut v, "foo.bar").unwrap());
    assert_eq!(v.head, "foo");
    let tail = v.tail.expect("tail should be present");
    assert_eq!(tail.dot, ".");
    assert_eq!(tail.name, "bar");
}

#[test]
fn test_dot_expr_head_only() {
    let pattern = Pattern::<DotExpr>::compile().unwrap();
    let mut v = DotExpr::default();

    assert!(pattern.find(&mut v, "head").unwrap());
    assert_eq!(v.head, "head");
    assert!(v.tail.is_none());
}

#[test]
fn test_dot_expr_no_match() {
    let pattern = Pattern::<DotExpr>::compile().unwrap();
    let mut v = DotExpr::default();

    assert!(!pattern.find(&mut v, ".oops").unwrap());
    assert_eq!(v, DotExpr::default());
}

#[test]
fn test_parse_returns_fresh_value() {
    let pattern = must_compile::<DotExpr>();
    let v = pattern.parse("a.b").unwrap().unwrap();
    assert_eq!(v.head, "a");
    assert_eq!(v.tail.map(|t| t.name), Some("b".to_string()));
    assert!(pattern.parse("a..b").unwrap().is_none());
}

// ============================================================================
// Scalar Representations
// ============================================================================

#[test]
fn test_url() {
    let pattern = compile::<Url>().unwrap();
    let mut v = Url::default();

    assert!(pattern.find(&mut v, "http://example.com").unwrap());
    assert_eq!(v.scheme, "http");
    assert_eq!(v.host, "example.com");
}

#[test]
fn test_nullable_scalars() {
    let pattern = compile::<NullableUrl>().unwrap();
    let mut v = NullableUrl::default();

    assert!(pattern.find(&mut v, "http://example.com").unwrap());
    assert_eq!(v.scheme.as_deref(), Some("http"));
    assert_eq!(v.host.as_deref(), Some("example.com"));
}

#[test]
fn test_nullable_scalars_untouched_on_failure() {
    let pattern = compile::<NullableUrl>().unwrap();
    let mut v = NullableUrl::default();

    assert!(!pattern.find(&mut v, "oops").unwrap());
    assert!(v.scheme.is_none());
    assert!(v.host.is_none());
}

#[test]
fn test_submatch_offsets() {
    let pattern = compile::<DotExprRegion>().unwrap();
    let mut v = DotExprRegion::default();

    assert!(pattern.find(&mut v, "foo.bar").unwrap());
    assert_submatch("foo", 0, 3, &v.head);
    let tail = v.tail.expect("tail should be present");
    assert_submatch(".", 3, 4, tail.dot.as_ref().unwrap());
    assert_submatch("bar", 4, 7, tail.name.as_ref().unwrap());
}

#[test]
fn test_schema_without_fragments_matches_anything() {
    let pattern = compile::<Nothing>().unwrap();
    let mut v = Nothing::default();

    assert!(pattern.find(&mut v, "abc").unwrap());
    assert_eq!(v.x, "");
    assert_eq!(pattern.captures_len(), 1);
}

// ============================================================================
// Position Markers
// ============================================================================

#[test]
fn test_positions_bracket_field() {
    let pattern = compile::<Bracketed>().unwrap();
    let mut v = Bracketed::default();

    assert!(pattern.find(&mut v, "abc").unwrap());
    assert_eq!(v.begin, Pos(0));
    assert_eq!(v.word, "abc");
    assert_eq!(v.end, Pos(3));
}

#[test]
fn test_positions_in_nested_schema() {
    let pattern = compile::<DotExprPos>().unwrap();
    let mut v = DotExprPos::default();

    assert!(pattern.find(&mut v, "foo.bar").unwrap());
    assert_eq!(v.begin, Pos(0));
    assert_eq!(v.middle, Pos(3));
    let tail = v.tail.expect("tail should be present");
    assert_eq!(tail.begin, Pos(3));
    assert_eq!(tail.middle, Pos(4));
    assert_eq!(tail.end, Pos(7));
    assert_eq!(v.end, Pos(7));
}

#[test]
fn test_degenerate_positions_share_offset() {
    let pattern = compile::<Degenerate>().unwrap();
    let mut v = Degenerate {
        x: Pos(9),
        y: Pos(9),
    };

    assert!(pattern.find(&mut v, "abc").unwrap());
    assert_eq!(v.x, Pos(0));
    assert_eq!(v.y, Pos(0));
}

// ============================================================================
// Repeated Matching
// ============================================================================

#[test]
fn test_find_all_words() {
    let pattern = compile::<Word>().unwrap();
    let words = pattern.find_all("ham is spam", None).unwrap();

    assert_eq!(words.len(), 3);
    assert_submatch("ham", 0, 3, &words[0].word);
    assert_submatch("is", 4, 6, &words[1].word);
    assert_submatch("spam", 7, 11, &words[2].word);
}

#[test]
fn test_find_all_limit() {
    let pattern = compile::<Word>().unwrap();

    let words = pattern.find_all("ham is spam", Some(2)).unwrap();
    assert_eq!(words.len(), 2);
    assert_submatch("is", 4, 6, &words[1].word);

    assert!(pattern.find_all("ham is spam", Some(0)).unwrap().is_empty());
}

#[test]
fn test_find_all_without_match() {
    let pattern = compile::<Word>().unwrap();
    assert!(pattern.find_all("  ...  ", None).unwrap().is_empty());
}

#[test]
fn test_find_all_into_replaces_contents() {
    let pattern = compile::<Word>().unwrap();
    let mut dest: Vec<Word> = Vec::new();

    pattern.find_all_into(&mut dest, "a b c d", None).unwrap();
    assert_eq!(dest.len(), 4);

    pattern.find_all_into(&mut dest, "x y", None).unwrap();
    assert_eq!(dest.len(), 2);
    assert_submatch("y", 2, 3, &dest[1].word);
}

// ============================================================================
// Compilation
// ============================================================================

#[test]
fn test_malformed_fragment_rejected() {
    let err = compile::<Malformed>().unwrap_err();
    match err {
        CompileError::PatternSyntax {
            schema,
            field,
            pattern,
            ..
        } => {
            assert_eq!(schema, "Malformed");
            assert_eq!(field, "x");
            assert_eq!(pattern, "(unclosed");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
#[should_panic(expected = "Malformed")]
fn test_must_compile_panics() {
    let _ = must_compile::<Malformed>();
}

#[test]
fn test_inner_groups_do_not_shift_slots() {
    let pattern = compile::<HasSubcaptures>().unwrap();
    let mut v = HasSubcaptures::default();

    assert!(pattern.find(&mut v, "abcd").unwrap());
    assert_eq!(v.name, "abcd");
    assert_eq!(pattern.captures_len(), 2);
    assert_eq!(pattern.stencil().slot_count(), 2);
}

#[test]
fn test_slot_layout() {
    let pattern = compile::<DotExpr>().unwrap();
    let slots = pattern.stencil().slots();

    assert_eq!(
        slots,
        vec![
            ("DotExpr".to_string(), 0),
            ("DotExpr.head".to_string(), 1),
            ("DotExpr.tail".to_string(), 2),
            ("DotExpr.tail".to_string(), 3),
            ("DotExpr.tail.dot".to_string(), 4),
            ("DotExpr.tail.name".to_string(), 5),
        ]
    );
    assert_eq!(pattern.captures_len(), 6);
}

#[test]
fn test_compilation_is_deterministic() {
    let first = compile::<DotExprPos>().unwrap();
    let second = compile::<DotExprPos>().unwrap();

    assert_eq!(first.as_str(), second.as_str());
    assert_eq!(first.stencil(), second.stencil());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_pattern_shared_across_threads() {
    let pattern = Arc::new(compile::<DotExpr>().unwrap());
    let inputs = ["a.b", "cc.dd", "eee", "f.g"];

    std::thread::scope(|scope| {
        for input in inputs {
            let pattern = Arc::clone(&pattern);
            scope.spawn(move || {
                let v = pattern.parse(input).unwrap().unwrap();
                assert!(input.starts_with(&v.head));
            });
        }
    });
}
