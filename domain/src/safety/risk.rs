//! Command risk classification
//!
//! Commands are matched, lower-cased, against ordered pattern tables. The
//! matching is substring and regex based, not a shell parser: it flags
//! harmless text that happens to contain a pattern (`git log --format`)
//! and misses destructive commands that use none (`unlink`, `find -delete`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Risk tier of a shell command
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
enum Matcher {
    Contains(&'static str),
    Regex(Regex),
}

/// One row of a risk table
#[derive(Debug)]
pub struct CommandPattern {
    matcher: Matcher,
    /// Short description shown in the command breakdown
    pub description: &'static str,
}

impl CommandPattern {
    fn contains(needle: &'static str, description: &'static str) -> Self {
        Self {
            matcher: Matcher::Contains(needle),
            description,
        }
    }

    fn regex(pattern: &str, description: &'static str) -> Self {
        Self {
            matcher: Matcher::Regex(Regex::new(pattern).expect("risk pattern is valid")),
            description,
        }
    }

    /// `command` must already be lower-cased.
    pub fn matches(&self, command: &str) -> bool {
        match &self.matcher {
            Matcher::Contains(needle) => command.contains(needle),
            Matcher::Regex(re) => re.is_match(command),
        }
    }
}

static HIGH_RISK_PATTERNS: LazyLock<Vec<CommandPattern>> = LazyLock::new(|| {
    vec![
        CommandPattern::regex(
            r"\brm\s+(-\w+\s+)+/\*?(\s|;|$)",
            "removes the filesystem root",
        ),
        CommandPattern::regex(r"\brm\s+(-\w+\s+)+\*(\s|;|$)", "removes everything in the directory"),
        CommandPattern::contains("dd if=", "raw disk write"),
        CommandPattern::contains("mkfs", "creates a filesystem"),
        CommandPattern::contains("format", "formats a device"),
        CommandPattern::contains("shred", "irrecoverably overwrites files"),
        CommandPattern::contains("chmod 777", "makes files world-writable"),
        CommandPattern::contains("chmod 000", "removes all permissions"),
    ]
});

static MEDIUM_RISK_PATTERNS: LazyLock<Vec<CommandPattern>> = LazyLock::new(|| {
    vec![
        CommandPattern::contains("rm -rf", "recursive forced delete"),
        CommandPattern::contains("rm -r", "recursive delete"),
        CommandPattern::contains("rmdir", "removes directories"),
        CommandPattern::contains("mv ", "moves or renames"),
        CommandPattern::contains("mv\t", "moves or renames"),
    ]
});

/// Substrings that mark a command as destructive
const DESTRUCTIVE_PATTERNS: &[&str] = &[
    "rm ", "rm\t", "rmdir", "mv ", "mv\t", "dd ", "dd\t", "shred", "wipe", "format", "mkfs",
    "> ", ">\t", "truncate", "chown", "chmod 000", "chmod 777",
];

/// Classify a command into a [`RiskTier`].
///
/// High-risk patterns are checked first, then medium; anything else is low.
pub fn classify(command: &str) -> RiskTier {
    let lowered = command.to_lowercase();
    if HIGH_RISK_PATTERNS.iter().any(|p| p.matches(&lowered)) {
        RiskTier::High
    } else if MEDIUM_RISK_PATTERNS.iter().any(|p| p.matches(&lowered)) {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Whether a command needs confirmation before it runs.
pub fn is_destructive(command: &str) -> bool {
    let lowered = command.trim().to_lowercase();
    DESTRUCTIVE_PATTERNS.iter().any(|p| lowered.contains(p))
}

/// Descriptions of every high- or medium-risk pattern the command matches.
pub fn matched_risks(command: &str) -> Vec<&'static str> {
    let lowered = command.to_lowercase();
    HIGH_RISK_PATTERNS
        .iter()
        .chain(MEDIUM_RISK_PATTERNS.iter())
        .filter(|p| p.matches(&lowered))
        .map(|p| p.description)
        .collect()
}

/// The "details" view of a destructive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBreakdown {
    pub command: String,
    pub tier: RiskTier,
    pub removes: bool,
    pub moves: bool,
    pub recursive: bool,
    pub force: bool,
    pub matched: Vec<&'static str>,
}

impl CommandBreakdown {
    pub fn of(command: &str) -> Self {
        let lowered = command.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let flags: Vec<&str> = words
            .iter()
            .copied()
            .filter(|w| w.starts_with('-') && !w.starts_with("--"))
            .collect();

        Self {
            command: command.to_string(),
            tier: classify(command),
            removes: lowered.contains("rm"),
            moves: lowered.contains("mv"),
            recursive: flags.iter().any(|f| f.contains('r')),
            force: flags.iter().any(|f| f.contains('f')),
            matched: matched_risks(command),
        }
    }

    /// One note per observed effect, in display order.
    pub fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.removes {
            notes.push("This command deletes files or directories".to_string());
        }
        if self.moves {
            notes.push("This command moves or renames files".to_string());
        }
        if self.recursive {
            notes.push("Recursive: applies to directory contents".to_string());
        }
        if self.force {
            notes.push("Force: skips confirmation prompts".to_string());
        }
        for description in &self.matched {
            notes.push(format!("Matches risk pattern: {}", description));
        }
        notes
    }
}
