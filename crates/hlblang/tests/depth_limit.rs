use hlblang::{check_file, generate, parse_file, GenOptions};

#[test]
fn recursion_depth_limit_triggers_error() {
    let src = br#"fs forever() {
	forever
}
"#;
    let parsed = parse_file(src, "depth.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert!(check_file(&parsed.file).is_empty());

    let opts = GenOptions { max_depth: 64, ..GenOptions::default() };
    let err = generate(&parsed.file, "forever", opts).unwrap_err();
    assert!(err.to_string().contains("ERROR_EVAL_DEPTH"));
}

#[test]
fn deep_but_finite_call_chains_evaluate() {
    let src = br#"fs base() {
	image "alpine"
}

fs layer1() {
	base
	env "L" "1"
}

fs layer2() {
	layer1
	env "L" "2"
}

fs default() {
	layer2
	env "L" "3"
}
"#;
    let parsed = parse_file(src, "depth.hlb").unwrap();
    assert!(check_file(&parsed.file).is_empty());
    let (st, _) = generate(&parsed.file, "default", GenOptions::default()).unwrap();
    assert_eq!(st.ops().len(), 4);
}
