use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub use_colors: bool,
    pub indent_style: IndentStyle,
    pub include_types: bool,
    pub verbosity: VerbosityLevel,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            indent_style: IndentStyle::Spaces(4),
            include_types: true,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl EmitterConfig {
    /// Uncolored output, as written to files and compared in tests.
    pub fn plain() -> Self {
        Self {
            use_colors: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl IndentStyle {
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerbosityLevel {
    Quiet,
    Normal,
    Verbose,
    Debug,
}

impl VerbosityLevel {
    /// Runtime declarations and the string table.
    pub fn should_print_declarations(&self) -> bool {
        *self >= VerbosityLevel::Normal
    }

    /// Every declared runtime function, called or not.
    pub fn should_print_unused_externals(&self) -> bool {
        *self >= VerbosityLevel::Verbose
    }

    /// Block labels, loop headers and the names behind stack slots.
    pub fn should_print_annotations(&self) -> bool {
        *self >= VerbosityLevel::Normal
    }

    pub fn should_print_predecessors(&self) -> bool {
        *self >= VerbosityLevel::Verbose
    }

    pub fn should_print_positions(&self) -> bool {
        matches!(self, VerbosityLevel::Debug)
    }
}
