use serde::Deserialize;

/// Spelling of exponentiation in the generated code.
///
/// `xpow` is what generated code has always used; `xexp` is the keyword q
/// itself defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PowerToken {
    #[default]
    Xpow,
    Xexp,
}

impl PowerToken {
    pub fn token(self) -> &'static str {
        match self {
            Self::Xpow => "xpow",
            Self::Xexp => "xexp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    /// Deepest statement/expression nesting accepted before failing.
    pub max_depth: usize,
    pub power: PowerToken,
}

impl Options {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            power: PowerToken::default(),
        }
    }
}
