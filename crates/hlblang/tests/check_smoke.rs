use hlblang::{check_file, parse_file};

fn check(src: &[u8]) -> Vec<String> {
    let parsed = parse_file(src, "check.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    check_file(&parsed.file)
        .into_iter()
        .map(|d| d.message)
        .collect()
}

#[test]
fn well_typed_program_passes() {
    let diags = check(
        br#"fs default() {
	image "alpine"
	run "echo hi" with option {
		env "K" "v"
		readonlyRootfs
	}
	mkdir "/x" 0o755
}
"#,
    );
    assert!(diags.is_empty(), "{:?}", diags);
}

#[test]
fn user_functions_and_params_resolve() {
    let diags = check(
        br#"fs base(string ref) {
	image ref
}

fs default() {
	base "alpine"
	run "true"
}
"#,
    );
    assert!(diags.is_empty(), "{:?}", diags);
}

#[test]
fn duplicate_declaration_is_reported() {
    let diags = check(
        br#"fs a() {
	scratch
}

fs a() {
	scratch
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_NAME duplicate declaration a")), "{:?}", diags);
}

#[test]
fn undefined_identifier_is_reported() {
    let diags = check(
        br#"fs a() {
	nonsuch
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_NAME undefined identifier nonsuch")), "{:?}", diags);
}

#[test]
fn chain_builtin_rejected_in_source_position() {
    let diags = check(
        br#"fs a() {
	run "x"
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_TYPE run is not a source operation")), "{:?}", diags);
}

#[test]
fn source_builtin_rejected_in_chain_position() {
    let diags = check(
        br#"fs a() {
	image "x"
	image "y"
}
"#,
    );
    assert!(
        diags.iter().any(|m| m.contains("ERROR_TYPE image is a source operation in chain position")),
        "{:?}",
        diags
    );
}

#[test]
fn arity_mismatch_is_reported() {
    let diags = check(
        br#"fs a() {
	git "remote"
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_TYPE wrong number of arguments to git")), "{:?}", diags);
}

#[test]
fn argument_type_mismatch_is_reported() {
    let diags = check(
        br#"fs a() {
	scratch
	mkdir "/x" "755"
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_TYPE expected int argument")), "{:?}", diags);
}

#[test]
fn wrong_with_kind_is_reported() {
    let diags = check(
        br#"fs a() {
	image "x" with option::git {
		keepGitDir
	}
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_TYPE expected option::image options")), "{:?}", diags);
}

#[test]
fn with_on_plain_chain_builtin_is_reported() {
    let diags = check(
        br#"fs a() {
	scratch
	env "K" "v" with option {
		readonlyRootfs
	}
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_TYPE env does not take options")), "{:?}", diags);
}

#[test]
fn string_blocks_are_source_only() {
    let diags = check(
        br#"string s() {
	value "a"
	value "b"
}
"#,
    );
    assert!(diags.iter().any(|m| m.contains("ERROR_TYPE string blocks do not chain")), "{:?}", diags);
}

#[test]
fn alias_rejected_in_referenced_option_value() {
    let diags = check(
        br#"option::run opts() {
	mount scratch "/m" as m
}
"#,
    );
    assert!(
        diags.iter().any(|m| m.contains("ERROR_TYPE alias is only allowed on mounts")),
        "{:?}",
        diags
    );
}

#[test]
fn mount_alias_allowed_inline_under_run() {
    let diags = check(
        br#"fs a() {
	image "alpine"
	run "true" with option {
		mount scratch "/m" as m
	}
}

fs b() {
	a
	copy m "/m/f" "/f"
}
"#,
    );
    assert!(diags.is_empty(), "{:?}", diags);
}

#[test]
fn export_must_name_a_function() {
    let diags = check(b"export nonsuch\n");
    assert!(diags.iter().any(|m| m.contains("ERROR_NAME undefined export nonsuch")), "{:?}", diags);
}

#[test]
fn empty_fs_block_requires_source() {
    let diags = check(b"fs a() {}\n");
    assert!(diags.iter().any(|m| m.contains("ERROR_TYPE fs block requires a source statement")), "{:?}", diags);
}

#[test]
fn with_referencing_user_option_value_passes() {
    let diags = check(
        br#"option::run verbose() {
	env "VERBOSE" "1"
}

fs default() {
	image "alpine"
	run "make" with verbose
}
"#,
    );
    assert!(diags.is_empty(), "{:?}", diags);
}

#[test]
fn variadic_zero_arguments_is_valid() {
    let diags = check(
        br#"fs a() {
	image "x"
	entrypoint
}
"#,
    );
    assert!(diags.is_empty(), "{:?}", diags);
}
