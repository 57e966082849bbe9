//! Option files and flags for the demo binary.
//!
//! Defaults live in a global config file and an optional local `.rawlinerc`,
//! one `--flag [value]` per line. Command-line flags are parsed into the
//! same [`ConfigFlags`] and layered on top with [`ConfigFlags::union`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::app::{DEFAULT_MAX_LENGTH, ReadOptions};
use crate::ui::HighlightOptions;

const APP_DIR: &str = "rawline";
const LOCAL_RC: &str = ".rawlinerc";

/// Flags that take a value (`--flag value` or `--flag=value`).
const VALUE_FLAGS: &[&str] = &[
    "--max-length",
    "--prompt",
    "--highlight-style",
    "--highlight-time",
    "--escape-message",
    "--insert-message",
    "--empty-message",
    "--debug-log",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub max_length: Option<usize>,
    pub prompt: Option<String>,
    pub no_highlight: bool,
    pub no_escape_highlight: bool,
    pub no_insert_highlight: bool,
    pub no_empty_highlight: bool,
    pub highlight_style: Option<String>,
    /// Microseconds
    pub highlight_time: Option<u64>,
    pub escape_message: Option<String>,
    pub insert_message: Option<String>,
    pub empty_message: Option<String>,
    pub debug_log: Option<PathBuf>,
    pub perf: bool,
}

impl ConfigFlags {
    /// Layer `other` over `self`: switches accumulate, values from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            max_length: other.max_length.or(self.max_length),
            prompt: other.prompt.clone().or_else(|| self.prompt.clone()),
            no_highlight: self.no_highlight || other.no_highlight,
            no_escape_highlight: self.no_escape_highlight || other.no_escape_highlight,
            no_insert_highlight: self.no_insert_highlight || other.no_insert_highlight,
            no_empty_highlight: self.no_empty_highlight || other.no_empty_highlight,
            highlight_style: other
                .highlight_style
                .clone()
                .or_else(|| self.highlight_style.clone()),
            highlight_time: other.highlight_time.or(self.highlight_time),
            escape_message: other
                .escape_message
                .clone()
                .or_else(|| self.escape_message.clone()),
            insert_message: other
                .insert_message
                .clone()
                .or_else(|| self.insert_message.clone()),
            empty_message: other
                .empty_message
                .clone()
                .or_else(|| self.empty_message.clone()),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
            perf: self.perf || other.perf,
        }
    }

    /// Build read options, falling back to the library defaults for
    /// anything not set. Escape spellings in strings are expanded.
    pub fn to_read_options(&self) -> ReadOptions {
        let defaults = HighlightOptions::default();
        let text = |value: &Option<String>, fallback: Option<String>| {
            value.as_deref().map(expand_escapes).or(fallback)
        };
        let highlight = HighlightOptions {
            message_highlight: !self.no_highlight,
            escape_highlight: !self.no_escape_highlight,
            insert_highlight: !self.no_insert_highlight,
            empty_highlight: !self.no_empty_highlight,
            highlight_style: text(&self.highlight_style, defaults.highlight_style),
            highlight_time: self
                .highlight_time
                .map_or(defaults.highlight_time, Duration::from_micros),
            escape_message: text(&self.escape_message, defaults.escape_message),
            insert_message: text(&self.insert_message, defaults.insert_message),
            empty_message: text(&self.empty_message, defaults.empty_message),
        };
        ReadOptions::new(self.max_length.unwrap_or(DEFAULT_MAX_LENGTH)).with_highlight(highlight)
    }

    fn set_value(&mut self, flag: &str, value: &str) {
        match flag {
            "--max-length" => self.max_length = value.parse().ok().filter(|n| *n > 0),
            "--prompt" => self.prompt = Some(value.to_string()),
            "--highlight-style" => self.highlight_style = Some(value.to_string()),
            "--highlight-time" => self.highlight_time = value.parse().ok(),
            "--escape-message" => self.escape_message = Some(value.to_string()),
            "--insert-message" => self.insert_message = Some(value.to_string()),
            "--empty-message" => self.empty_message = Some(value.to_string()),
            "--debug-log" => self.debug_log = Some(PathBuf::from(value)),
            _ => {}
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR).join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join(APP_DIR).join("config");
        }
    }

    PathBuf::from(LOCAL_RC)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_RC)
}

/// Load flags from a config file. A missing file yields empty flags.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| match line.split_once(char::is_whitespace) {
            Some((flag, value)) => vec![flag.to_string(), unquote(value.trim()).to_string()],
            None => vec![line.to_string()],
        })
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as a config file, creating parent directories.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# rawline defaults (saved with --save)".to_string()];
    if let Some(max_length) = flags.max_length {
        lines.push(format!("--max-length {max_length}"));
    }
    let quoted = [
        ("--prompt", &flags.prompt),
        ("--highlight-style", &flags.highlight_style),
        ("--escape-message", &flags.escape_message),
        ("--insert-message", &flags.insert_message),
        ("--empty-message", &flags.empty_message),
    ];
    for (flag, value) in quoted {
        if let Some(value) = value {
            lines.push(format!("{flag} \"{}\"", escape_control(value)));
        }
    }
    if let Some(micros) = flags.highlight_time {
        lines.push(format!("--highlight-time {micros}"));
    }
    let switches = [
        ("--no-highlight", flags.no_highlight),
        ("--no-escape-highlight", flags.no_escape_highlight),
        ("--no-insert-highlight", flags.no_insert_highlight),
        ("--no-empty-highlight", flags.no_empty_highlight),
        ("--perf", flags.perf),
    ];
    lines.extend(
        switches
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(flag, _)| flag.to_string()),
    );
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list; anything else is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (flag, inline_value) = match token.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (token, None),
        };
        match flag {
            "--no-highlight" => flags.no_highlight = true,
            "--no-escape-highlight" => flags.no_escape_highlight = true,
            "--no-insert-highlight" => flags.no_insert_highlight = true,
            "--no-empty-highlight" => flags.no_empty_highlight = true,
            "--perf" => flags.perf = true,
            _ if VALUE_FLAGS.contains(&flag) => {
                if let Some(value) = inline_value {
                    flags.set_value(flag, value);
                } else if let Some(next) = tokens.get(i + 1) {
                    flags.set_value(flag, next);
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

/// Turn `\e`, `\033` and `\x1b` spellings into a real ESC.
pub fn expand_escapes(s: &str) -> String {
    s.replace("\\033", "\x1b")
        .replace("\\x1b", "\x1b")
        .replace("\\x1B", "\x1b")
        .replace("\\e", "\x1b")
}

fn escape_control(s: &str) -> String {
    s.replace('\x1b', "\\e")
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}
