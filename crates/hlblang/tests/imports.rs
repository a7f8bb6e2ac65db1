use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use hlblang::ast::File;
use hlblang::{check_file, generate, parse_file, GenOptions, ImportResolver};
use llbcore::{Op, State};

struct MapResolver {
    modules: BTreeMap<String, &'static [u8]>,
}

impl ImportResolver for MapResolver {
    fn resolve(&self, alias: &str, _source: &State) -> Result<File> {
        let src = self
            .modules
            .get(alias)
            .ok_or_else(|| anyhow!("unknown module {}", alias))?;
        let parsed = parse_file(src, alias)?;
        if !parsed.errors.is_empty() {
            return Err(anyhow!("module {} failed to parse", alias));
        }
        Ok(parsed.file)
    }
}

const UTIL: &[u8] = br#"export base

fs base() {
	image "alpine"
}

fs hidden() {
	image "private"
}
"#;

const MAIN: &[u8] = br#"import util from fs {
	image "registry/util"
}

fs default() {
	util.base
	run "echo hi"
}
"#;

fn resolver() -> Box<dyn ImportResolver> {
    let mut modules = BTreeMap::new();
    modules.insert("util".to_string(), UTIL);
    Box::new(MapResolver { modules })
}

#[test]
fn exported_names_are_callable_through_the_alias() {
    let parsed = parse_file(MAIN, "main.hlb").unwrap();
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert!(check_file(&parsed.file).is_empty());

    let opts = GenOptions { resolver: Some(resolver()), ..GenOptions::default() };
    let (st, _) = generate(&parsed.file, "default", opts).unwrap();
    assert!(matches!(&st.ops()[0], Op::Image { reference, .. } if reference == "alpine"));
    assert!(matches!(&st.ops()[1], Op::Run { .. }));
}

#[test]
fn unexported_names_are_rejected() {
    let src = br#"import util from fs {
	image "registry/util"
}

fs default() {
	util.hidden
}
"#;
    let parsed = parse_file(src, "main.hlb").unwrap();
    assert!(check_file(&parsed.file).is_empty());

    let opts = GenOptions { resolver: Some(resolver()), ..GenOptions::default() };
    let err = generate(&parsed.file, "default", opts).unwrap_err();
    assert!(err.to_string().contains("ERROR_IMPORT util does not export hidden"));
}

#[test]
fn missing_resolver_fails_on_reference() {
    let parsed = parse_file(MAIN, "main.hlb").unwrap();
    let err = generate(&parsed.file, "default", GenOptions::default()).unwrap_err();
    assert!(err.to_string().contains("ERROR_IMPORT unresolved import util"));
}

#[test]
fn unknown_qualifier_is_a_check_error() {
    let src = br#"fs default() {
	nope.base
}
"#;
    let parsed = parse_file(src, "main.hlb").unwrap();
    let diags = check_file(&parsed.file);
    assert!(
        diags.iter().any(|d| d.message.contains("ERROR_NAME undefined import nope")),
        "{:?}",
        diags
    );
}
