use hlblang::ast::ObjType;
use hlblang::lex::{lex, TokKind};

fn kinds(src: &[u8]) -> Vec<TokKind> {
    lex(src).into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_func_header() {
    let ks = kinds(b"fs default() {\n\tscratch\n}\n");
    assert_eq!(
        ks,
        vec![
            TokKind::Type(ObjType::Fs),
            TokKind::Ident("default".to_string()),
            TokKind::LParen,
            TokKind::RParen,
            TokKind::LBrace,
            TokKind::Newline,
            TokKind::Ident("scratch".to_string()),
            TokKind::Newline,
            TokKind::RBrace,
            TokKind::Newline,
            TokKind::Eof,
        ]
    );
}

#[test]
fn positions_track_lines_and_columns() {
    let toks = lex(b"fs a()\n\tb\n");
    assert_eq!(toks[0].pos.line, 1);
    assert_eq!(toks[0].pos.column, 1);
    assert_eq!(toks[0].end.column, 3);
    // b on line 2, after one tab
    let b = toks.iter().find(|t| t.kind == TokKind::Ident("b".to_string())).unwrap();
    assert_eq!(b.pos.line, 2);
    assert_eq!(b.pos.column, 2);
    assert_eq!(b.pos.offset, 8);
}

#[test]
fn numeric_bases() {
    let ks = kinds(b"0x1ff 0o755 0b101 42 0");
    assert_eq!(
        ks,
        vec![
            TokKind::Numeric { value: 511, base: 16 },
            TokKind::Numeric { value: 493, base: 8 },
            TokKind::Numeric { value: 5, base: 2 },
            TokKind::Decimal(42),
            TokKind::Decimal(0),
            TokKind::Eof,
        ]
    );
}

#[test]
fn string_escapes_and_raw_strings() {
    let ks = kinds(br#""a\n\"b\"" 'raw "quoted"'"#);
    assert_eq!(
        ks,
        vec![
            TokKind::Str("a\n\"b\"".to_string()),
            TokKind::Str("raw \"quoted\"".to_string()),
            TokKind::Eof,
        ]
    );
}

#[test]
fn keywords_and_types() {
    let ks = kinds(b"with as variadic option::run true false");
    assert_eq!(
        ks,
        vec![
            TokKind::KwWith,
            TokKind::KwAs,
            TokKind::KwVariadic,
            TokKind::Type(ObjType::OptionRun),
            TokKind::Bool(true),
            TokKind::Bool(false),
            TokKind::Eof,
        ]
    );
}

#[test]
fn comment_carries_text_and_terminates_line() {
    let ks = kinds(b"# a note\nscratch\n");
    assert_eq!(
        ks,
        vec![
            TokKind::Comment(" a note".to_string()),
            TokKind::Ident("scratch".to_string()),
            TokKind::Newline,
            TokKind::Eof,
        ]
    );
}

#[test]
fn heredoc_plain() {
    let toks = lex(b"mkfile <<EOM\nhello\nworld\nEOM\n");
    assert_eq!(toks[1].kind, TokKind::Str("hello\nworld".to_string()));
    assert_eq!(toks[2].kind, TokKind::Newline);
}

#[test]
fn heredoc_tilde_strips_all_leading_whitespace() {
    let toks = lex(b"mkfile <<~EOM\n  hello\n\t world\nEOM\n");
    assert_eq!(toks[1].kind, TokKind::Str("hello\nworld".to_string()));
}

#[test]
fn heredoc_dash_strips_common_tabs() {
    let toks = lex(b"mkfile <<-EOM\n\t\ta\n\t\t\tb\nEOM\n");
    assert_eq!(toks[1].kind, TokKind::Str("a\n\tb".to_string()));
}

#[test]
fn heredoc_with_nested_quotes() {
    let toks = lex(b"mkfile <<EOM\necho \"hi 'there'\"\nEOM\n");
    assert_eq!(toks[1].kind, TokKind::Str("echo \"hi 'there'\"".to_string()));
}

#[test]
fn bad_token_for_unknown_input() {
    let toks = lex(b"@!?\nscratch\n");
    assert!(matches!(&toks[0].kind, TokKind::Bad(msg) if msg.contains("ERROR_LEX")));
    assert_eq!(toks[1].kind, TokKind::Newline);
}
