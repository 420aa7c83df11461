//! Engine configuration (spec §6): the transpile target, the search root
//! used to resolve bare module names to files, and the handful of flags a
//! sub-engine inherits unchanged from its parent when an import is loaded.

use std::path::PathBuf;

/// The closed set of backend targets spec §6's `lang` field names.
pub const SUPPORTED_LANGS: &[&str] = &["c", "py", "python", "dart", "js", "javascript", "ts", "haxe", "d"];

/// A transpile target. `platform` mirrors the reference's `for TARGET in
/// {...}` conditional-compilation marker (spec §4.F): a `for` loop whose
/// iterable is a brace set of target names is pruned to the branch matching
/// `platform`, the rest dropped at engine time rather than emitted.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// One of [`SUPPORTED_LANGS`]; selects the (out-of-scope) backend.
    pub lang: String,
    pub platform: String,
    /// Freeform string passed through to the backend untouched.
    pub framework: String,
    /// Whether this engine is itself a sub-engine processing an import
    /// (spec §6: "boolean or name"; Photon's in-place import processing
    /// never spins up a real sub-engine, so this just records the
    /// importing module's own dotted name for diagnostics).
    pub module: Option<String>,
    pub debug: bool,
    /// Suppress anything past IR construction -- every import is loaded
    /// this way (spec §4.G's "transpile-only mode"), and the entry file
    /// can be too when the CLI is asked to type-check without emitting.
    pub transpile_only: bool,
    /// Second search step for `import x` (first is cwd, per
    /// SPEC_FULL.md's resolution of the `os.listdir(None)` open question);
    /// third (always `Unsupported`) is a native-extension directory spec
    /// §4.G never actually gives a path for.
    pub standard_libs: Option<PathBuf>,
    pub search_root: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            lang: "c".to_string(),
            platform: std::env::consts::OS.to_string(),
            framework: String::new(),
            module: None,
            debug: false,
            transpile_only: false,
            standard_libs: None,
            search_root: PathBuf::from("."),
        }
    }
}

impl EngineConfig {
    pub fn new(lang: impl Into<String>, platform: impl Into<String>) -> Self {
        EngineConfig { lang: lang.into(), platform: platform.into(), ..EngineConfig::default() }
    }

    pub fn is_lang_supported(&self) -> bool {
        SUPPORTED_LANGS.contains(&self.lang.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_platform_follows_host_os() {
        assert_eq!(EngineConfig::default().platform, std::env::consts::OS);
    }

    #[test]
    fn lang_validation_accepts_aliases_and_rejects_unknown() {
        assert!(EngineConfig::new("py", "linux").is_lang_supported());
        assert!(EngineConfig::new("javascript", "linux").is_lang_supported());
        assert!(!EngineConfig::new("rust", "linux").is_lang_supported());
    }
}
