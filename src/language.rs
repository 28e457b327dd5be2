//! Static configuration for the supported target languages.

use crate::error::HarnessError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// The canonical id list, in preference order, for error messages.
pub const SUPPORTED_IDS: &str = "javascript, typescript, python, java, cpp";

/// A language a submission can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Java,
    Cpp,
}

/// Where a language's generated driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Spawned against an interpreter on this host.
    Local,
    /// Submitted to the hosted execution service.
    Remote,
}

/// Process-wide configuration for one supported language.
pub struct LanguageProfile {
    pub language: Language,
    pub display_name: &'static str,
    pub mode: ExecutionMode,
    /// Language id the execution service expects; differs from ours for C++.
    pub remote_id: &'static str,
    /// Runtime version pinned against the service's fixed runtime set.
    pub runtime_version: &'static str,
    /// File name the driver is written under. The remote service keys its
    /// compile step off the extension, and Java requires `Main.java`.
    pub driver_file: &'static str,
    entry_point: Regex,
}

impl LanguageProfile {
    /// Extracts the entry-point name from submitted source, taking the first
    /// declaration the language's pattern finds.
    ///
    /// Returns `None` when nothing matches; the caller decides whether that
    /// is fatal or an explicit name was provided anyway.
    pub fn extract_entry_point(&self, source: &str) -> Option<String> {
        let captures = self.entry_point.captures(source)?;
        captures
            .iter()
            .skip(1)
            .flatten()
            .next()
            .map(|group| group.as_str().to_string())
    }
}

lazy_static! {
    static ref PROFILES: [LanguageProfile; 5] = [
        LanguageProfile {
            language: Language::Javascript,
            display_name: "JavaScript",
            mode: ExecutionMode::Local,
            remote_id: "javascript",
            runtime_version: "18.15.0",
            driver_file: "main.js",
            entry_point: Regex::new(
                r"function\s+([A-Za-z_$][\w$]*)\s*\(|(?:var|let|const)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:function\b|\()"
            )
            .expect("javascript entry point pattern is valid"),
        },
        LanguageProfile {
            language: Language::Typescript,
            display_name: "TypeScript",
            mode: ExecutionMode::Local,
            remote_id: "typescript",
            runtime_version: "5.0.3",
            driver_file: "main.js",
            entry_point: Regex::new(
                r"function\s+([A-Za-z_$][\w$]*)\s*[(<]|(?:var|let|const)\s+([A-Za-z_$][\w$]*)(?:\s*:\s*[^=\n]+)?\s*=\s*(?:async\s+)?(?:function\b|\()"
            )
            .expect("typescript entry point pattern is valid"),
        },
        LanguageProfile {
            language: Language::Python,
            display_name: "Python",
            mode: ExecutionMode::Local,
            remote_id: "python",
            runtime_version: "3.10.0",
            driver_file: "main.py",
            entry_point: Regex::new(r"def\s+([A-Za-z_]\w*)\s*\(")
                .expect("python entry point pattern is valid"),
        },
        LanguageProfile {
            language: Language::Java,
            display_name: "Java",
            mode: ExecutionMode::Remote,
            remote_id: "java",
            runtime_version: "15.0.2",
            driver_file: "Main.java",
            entry_point: Regex::new(
                r"(?:public|protected|private)\s+(?:static\s+)?(?:final\s+)?[\w<>\[\],.\s]*?\b([A-Za-z_]\w*)\s*\("
            )
            .expect("java entry point pattern is valid"),
        },
        LanguageProfile {
            language: Language::Cpp,
            display_name: "C++",
            mode: ExecutionMode::Remote,
            remote_id: "c++",
            runtime_version: "10.2.0",
            driver_file: "main.cpp",
            entry_point: Regex::new(r"(?:[\w:<>*&]+\s+)+?([A-Za-z_]\w*)\s*\(")
                .expect("cpp entry point pattern is valid"),
        },
    ];
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Javascript,
        Language::Typescript,
        Language::Python,
        Language::Java,
        Language::Cpp,
    ];

    pub fn profile(self) -> &'static LanguageProfile {
        &PROFILES[self as usize]
    }

    pub const fn id(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::Javascript),
            "typescript" | "ts" => Ok(Language::Typescript),
            "python" | "python3" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "cpp" | "c++" => Ok(Language::Cpp),
            _ => Err(HarnessError::UnsupportedLanguage(s.trim().to_string())),
        }
    }
}


#[cfg(test)]
mod profile {
    use super::*;

    #[test]
    fn profiles_are_indexed_by_discriminant() {
        for language in Language::ALL {
            assert_eq!(language.profile().language, language);
        }
    }

    #[test]
    fn only_interpreted_languages_run_locally() {
        assert_eq!(Language::Javascript.profile().mode, ExecutionMode::Local);
        assert_eq!(Language::Typescript.profile().mode, ExecutionMode::Local);
        assert_eq!(Language::Python.profile().mode, ExecutionMode::Local);
        assert_eq!(Language::Java.profile().mode, ExecutionMode::Remote);
        assert_eq!(Language::Cpp.profile().mode, ExecutionMode::Remote);
    }
}
