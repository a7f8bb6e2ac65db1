//! Canonical JSON encoding of build-graph states.

use anyhow::Result;
use serde::Serialize;

use crate::state::State;

#[derive(Serialize)]
struct Envelope<'a> {
    kind: &'static str,
    state: &'a State,
}

/// Encode a state as version-tagged canonical JSON. Field and variant order
/// is fixed by the type definitions, so equal states encode to equal bytes.
pub fn encode_state_json(st: &State) -> Result<Vec<u8>> {
    let env = Envelope { kind: "hlb/llb/v0", state: st };
    Ok(serde_json::to_vec(&env)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_across_encodes() {
        let st = State::image("alpine", vec![]).add_env("A", "b");
        assert_eq!(encode_state_json(&st).unwrap(), encode_state_json(&st).unwrap());
    }

    #[test]
    fn version_tagged() {
        let bytes = encode_state_json(&State::scratch()).unwrap();
        let s = String::from_utf8(bytes).unwrap();
        assert!(s.contains("hlb/llb/v0"));
    }
}
