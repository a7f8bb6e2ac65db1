use hlblang::{check_file, generate, parse_file, GenOptions};
use llbcore::{FileAction, Op, State};

fn gen(src: &[u8], target: &str) -> State {
    let parsed = parse_file(src, "alias.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let diags = check_file(&parsed.file);
    assert!(diags.is_empty(), "{:?}", diags);
    generate(&parsed.file, target, GenOptions::default()).unwrap().0
}

#[test]
fn mount_alias_captures_post_exec_filesystem() {
    let st = gen(
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
        "b",
    );

    let ops = st.ops();
    assert!(matches!(&ops[0], Op::Image { reference, .. } if reference == "alpine"));
    assert!(matches!(&ops[1], Op::Run { .. }));

    match &ops[2] {
        Op::File { action: FileAction::Copy { input, src, dest, .. } } => {
            assert_eq!(src, "/m/f");
            assert_eq!(dest, "/f");
            match &input.ops()[0] {
                Op::MountSource { exec, target } => {
                    assert_eq!(target, "/m");
                    // the mount's subgraph is rooted after the exec
                    assert!(matches!(exec.ops().last(), Some(Op::Run { .. })));
                }
                other => panic!("expected mount source, got {:?}", other),
            }
        }
        other => panic!("expected copy, got {:?}", other),
    }
}

#[test]
fn chain_alias_is_addressable_as_target() {
    let st = gen(
        br#"fs a() {
	image "alpine" as base
	run "true"
}
"#,
        "base",
    );
    assert_eq!(st.ops().len(), 1);
    assert!(matches!(&st.ops()[0], Op::Image { reference, .. } if reference == "alpine"));
}

#[test]
fn source_alias_referenced_from_sibling_function() {
    let st = gen(
        br#"fs a() {
	image "alpine"
	mkdir "/x" 0o755 as with_dir
	run "true"
}

fs b() {
	with_dir
	env "K" "v"
}
"#,
        "b",
    );
    let ops = st.ops();
    // the alias captures a through mkdir, without the trailing run
    assert!(matches!(&ops[0], Op::Image { .. }));
    assert!(matches!(&ops[1], Op::File { .. }));
    assert!(matches!(&ops[2], Op::Env { .. }));
    assert_eq!(ops.len(), 3);
}
