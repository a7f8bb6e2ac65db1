use hlblang::{parse_file, print_file};
use pretty_assertions::assert_eq;

fn fmt(src: &[u8]) -> String {
    let parsed = parse_file(src, "fmt.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    print_file(&parsed.file)
}

#[test]
fn normalizes_single_line_blocks() {
    let out = fmt(b"fs default() { scratch; }\n");
    assert_eq!(out, "fs default() {\n\tscratch\n}\n");
}

#[test]
fn separates_declarations_with_one_blank_line() {
    let out = fmt(b"fs a() { scratch; }\nfs b() { scratch; }\n");
    assert_eq!(out, "fs a() {\n\tscratch\n}\n\nfs b() {\n\tscratch\n}\n");
}

#[test]
fn prints_signatures_and_literals() {
    let out = fmt(
        br#"fs build(string ref, variadic string flags) {
	image ref
	mkdir "/x" 0o755
	mkfile "/f" 0x1a4 "a\nb"
	run "true" as done
}
"#,
    );
    assert_eq!(
        out,
        "fs build(string ref, variadic string flags) {\n\timage ref\n\tmkdir \"/x\" 0o755\n\tmkfile \"/f\" 0x1a4 \"a\\nb\"\n\trun \"true\" as done\n}\n"
    );
}

#[test]
fn prints_inline_option_blocks_indented() {
    let out = fmt(
        br#"fs default() {
	image "alpine"
	run "make" with option {
		env "K" "v"
	}
}
"#,
    );
    assert_eq!(
        out,
        "fs default() {\n\timage \"alpine\"\n\trun \"make\" with option {\n\t\tenv \"K\" \"v\"\n\t}\n}\n"
    );
}

#[test]
fn preserves_comments_in_place() {
    let src = br#"# header for a
fs a() {
	# leading note
	scratch
	run "x" # trailing note
}
"#;
    let out = fmt(src);
    assert_eq!(
        out,
        "# header for a\nfs a() {\n\t# leading note\n\tscratch\n\trun \"x\" # trailing note\n}\n"
    );
}

#[test]
fn formatting_is_idempotent() {
    let sources: &[&[u8]] = &[
        b"fs default() { scratch; }\n",
        br#"# doc
fs a() {
	image "x" with option { resolve; }

	run "y" as out
}

export a

string s() {
	format "%s %d" "n" 0x10
}
"#,
        br#"import util from fs { image "u"; }

fs b(string tag) {
	image tag
	mkdir "/x" 0o700
}
"#,
    ];

    for src in sources {
        let once = fmt(src);
        let twice = fmt(once.as_bytes());
        assert_eq!(once, twice, "formatting not idempotent for {:?}", String::from_utf8_lossy(src));
    }
}

#[test]
fn heredocs_normalize_to_quoted_strings() {
    let src = b"fs f() {\n\tscratch\n\tmkfile \"/f\" 0o644 <<~EOM\n\t\thello\n\t\tworld\n\tEOM\n}\n";
    let once = fmt(src);
    assert!(once.contains("\"hello\\nworld\""), "{}", once);
    let twice = fmt(once.as_bytes());
    assert_eq!(once, twice);
}
