use hlblang::ast::{BasicLit, Decl, Expr, ObjType, WithExpr};
use hlblang::parse_file;

#[test]
fn parses_minimal_file() {
    let src = br#"fs default() {
	image "alpine"
	run "echo hi"
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

    let funcs: Vec<_> = parsed.file.funcs().collect();
    assert_eq!(funcs.len(), 1);
    assert_eq!(funcs[0].name.name, "default");
    assert_eq!(funcs[0].ret.obj, ObjType::Fs);

    let body = funcs[0].body.as_ref().unwrap();
    let calls = body.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].func.name, "image");
    match &calls[0].args[0] {
        Expr::Lit(BasicLit::Str(s)) => assert_eq!(s.value, "alpine"),
        other => panic!("expected string literal, got {:?}", other),
    }
}

#[test]
fn parses_params_and_variadic_marker() {
    let src = br#"fs build(string ref, variadic string flags) {
	image ref
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let func = parsed.file.funcs().next().unwrap();
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.params[0].typ.obj, ObjType::Str);
    assert_eq!(func.params[0].name.name, "ref");
    assert!(!func.params[0].variadic);
    assert!(func.params[1].variadic);
}

#[test]
fn parses_with_and_alias() {
    let src = br#"fs a() {
	image "x" with option { resolve; }
	run "y" as result
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let func = parsed.file.funcs().next().unwrap();
    let calls = func.body.as_ref().unwrap().calls();

    let with = calls[0].with.as_ref().unwrap();
    match &with.expr {
        WithExpr::FuncLit(lit) => {
            assert_eq!(lit.typ.obj, ObjType::Option);
            assert_eq!(lit.body.calls()[0].func.name, "resolve");
        }
        other => panic!("expected option literal, got {:?}", other),
    }

    let alias = calls[1].alias.as_ref().unwrap();
    assert_eq!(alias.name.name, "result");
}

#[test]
fn parses_import_export_and_dotted_calls() {
    let src = br#"import util from fs { image "registry/util"; }

export default

fs default() {
	util.base
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

    let import = parsed.file.imports().next().unwrap();
    assert_eq!(import.name.name, "util");
    assert_eq!(import.from.typ.obj, ObjType::Fs);

    let export = parsed.file.exports().next().unwrap();
    assert_eq!(export.name.name, "default");

    let func = parsed.file.funcs().next().unwrap();
    let call = func.body.as_ref().unwrap().calls()[0];
    assert_eq!(call.func.qualifier.as_deref(), Some("util"));
    assert_eq!(call.func.name, "base");
}

#[test]
fn attaches_doc_comments() {
    let src = br#"# builds the base image
# for all targets
fs base() {
	# pin the distro
	image "alpine"
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

    let func = parsed.file.funcs().next().unwrap();
    let doc = func.doc.as_ref().unwrap();
    assert_eq!(doc.list.len(), 2);
    assert_eq!(doc.list[0].text, " builds the base image");

    let call = func.body.as_ref().unwrap().calls()[0];
    let call_doc = call.doc.as_ref().unwrap();
    assert_eq!(call_doc.list[0].text, " pin the distro");
}

#[test]
fn doc_separated_by_blank_line_stays_trivia() {
    let src = br#"# a stray header

fs base() {
	scratch
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(parsed.errors.is_empty());
    let func = parsed.file.funcs().next().unwrap();
    assert!(func.doc.is_none());
    assert!(parsed.file.decls.iter().any(|d| matches!(d, Decl::Doc(_))));
}

#[test]
fn bad_decl_recovers_at_next_declaration() {
    let src = br#"fs () {
	scratch
}

fs ok() {
	scratch
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(!parsed.errors.is_empty());
    assert!(parsed.errors[0].message.contains("ERROR_PARSE"));
    assert!(parsed.file.decls.iter().any(|d| matches!(d, Decl::Bad(_))));

    let funcs: Vec<_> = parsed.file.funcs().collect();
    assert_eq!(funcs.len(), 1);
    assert_eq!(funcs[0].name.name, "ok");
}

#[test]
fn position_monotonicity() {
    let src = br#"fs a() {
	image "x"
	run "y"
}

string s() {
	value "v"
}
"#;
    let parsed = parse_file(src, "build.hlb").unwrap();
    assert!(parsed.errors.is_empty());

    let mut prev_end = None;
    for decl in &parsed.file.decls {
        assert!(decl.pos() <= decl.end(), "node start exceeds end");
        if let Some(prev) = prev_end {
            assert!(prev <= decl.pos(), "siblings out of order");
        }
        prev_end = Some(decl.end());
    }

    for func in parsed.file.funcs() {
        let body = func.body.as_ref().unwrap();
        let mut prev = None;
        for stmt in &body.list {
            assert!(stmt.pos() <= stmt.end());
            if let Some(p) = prev {
                assert!(p <= stmt.pos());
            }
            prev = Some(stmt.end());
        }
    }
}

#[test]
fn empty_file_parses() {
    let parsed = parse_file(b"", "empty.hlb").unwrap();
    assert!(parsed.errors.is_empty());
    assert!(parsed.file.funcs().next().is_none());
}

#[test]
fn comment_only_file_preserves_doc() {
    let parsed = parse_file(b"# nothing here\n", "doc.hlb").unwrap();
    assert!(parsed.errors.is_empty());
    assert!(matches!(parsed.file.decls[0], Decl::Doc(_)));
}
