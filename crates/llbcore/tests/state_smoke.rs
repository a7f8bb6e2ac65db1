use llbcore::{
    encode_state_json, CopyInfo, CopyOpt, ExecOpt, FileAction, ImageOpt, Op, State,
};
use pretty_assertions::assert_eq;

#[test]
fn states_build_as_ordered_op_chains() {
    let st = State::image("alpine", vec![ImageOpt::Resolve])
        .add_env("PATH", "/bin")
        .dir("/src")
        .file(FileAction::Mkdir { path: "/out".to_string(), mode: 0o755, opts: vec![] });

    let ops = st.ops();
    assert_eq!(ops.len(), 4);
    assert!(matches!(&ops[0], Op::Image { reference, opts }
        if reference == "alpine" && opts == &vec![ImageOpt::Resolve]));
    assert!(matches!(&ops[3], Op::File { .. }));
}

#[test]
fn exec_roots_and_mounts() {
    let exec = State::image("alpine", vec![]).run(
        "make",
        vec![ExecOpt::Mount {
            input: State::scratch(),
            target: "/cache".to_string(),
            opts: vec![],
        }],
    );

    let root = exec.root();
    assert!(matches!(root.ops().last(), Some(Op::Run { command, .. }) if command == "make"));

    let mount = exec.get_mount("/cache");
    match &mount.ops()[0] {
        Op::MountSource { exec, target } => {
            assert_eq!(target, "/cache");
            assert_eq!(exec.ops().len(), 2);
        }
        other => panic!("expected mount source, got {:?}", other),
    }
}

#[test]
fn copy_info_folds_boolean_options() {
    let (info, rest) = CopyInfo::split(vec![
        CopyOpt::CreateDestPath(true),
        CopyOpt::Chown("nobody".to_string()),
        CopyOpt::AllowWildcards(true),
    ]);
    assert!(info.create_dest_path);
    assert!(info.allow_wildcard);
    assert!(!info.follow_symlinks);
    assert_eq!(rest, vec![CopyOpt::Chown("nobody".to_string())]);
}

#[test]
fn canonical_encoding_is_structural() {
    let a = State::image("alpine", vec![]).add_env("A", "1");
    let b = State::image("alpine", vec![]).add_env("A", "1");
    assert_eq!(encode_state_json(&a).unwrap(), encode_state_json(&b).unwrap());

    let c = State::image("alpine", vec![]).add_env("A", "2");
    assert_ne!(encode_state_json(&a).unwrap(), encode_state_json(&c).unwrap());
}
