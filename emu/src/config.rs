use serde::{Deserialize, Serialize};

pub use crate::memory::SubwordAccess;

/// Default load address and initial program counter.
pub const DEFAULT_TEXT_START: u64 = 0x0040_0000;

/// What the run loop does when the core reports an unsupported encoding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    /// Stop running and report the offending word.
    #[default]
    Stop,

    /// Step over the word and keep going.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub text_start: u64,
    /// Upper bound on executed steps. `None` runs until halt.
    pub max_steps: Option<u64>,
    pub subword_access: SubwordAccess,
    pub on_unsupported: UnsupportedPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            text_start: DEFAULT_TEXT_START,
            max_steps: None,
            subword_access: SubwordAccess::default(),
            on_unsupported: UnsupportedPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = SimConfig::default();
        assert_eq!(config.text_start, 0x40_0000);
        assert_eq!(config.max_steps, None);
        assert_eq!(config.subword_access, SubwordAccess::Precise);
        assert_eq!(config.on_unsupported, UnsupportedPolicy::Stop);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"max_steps": 100, "subword_access": "legacy"}"#).unwrap();

        assert_eq!(
            config,
            SimConfig {
                max_steps: Some(100),
                subword_access: SubwordAccess::Legacy,
                ..SimConfig::default()
            }
        );
    }
}
