//! Desktop application discovery.
//!
//! Scans the freedesktop application directories for `.desktop` files and
//! turns them into launchable entries:
//! - Parses Name/Exec/Icon/NoDisplay with a deliberately light parser
//! - Strips `%f`/`%U`-style Exec placeholders
//! - Resolves icon names against the common hicolor/pixmaps directories and
//!   embeds them as base64 data URLs for the presentation layer

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

/// An installed application parsed from a desktop entry.
#[derive(Debug, Clone)]
pub struct AppEntry {
    /// Display name (e.g. "Firefox").
    pub name: String,
    /// Exec command line with placeholders stripped.
    pub exec: String,
    /// Icon embedded as a data URL, when one could be resolved.
    pub icon_data: Option<String>,
}

/// The standard application directories, system-wide then per-user.
pub fn desktop_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/share/applications"),
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("applications"),
    ]
}

/// Collect entries from `.desktop` files under the given directories.
pub fn collect_entries(dirs: &[PathBuf]) -> Vec<AppEntry> {
    let mut entries = Vec::new();
    for dir in dirs {
        if !dir.exists() {
            continue;
        }
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("desktop") {
                if let Some(app) = parse_desktop_file(path) {
                    entries.push(app);
                }
            }
        }
    }
    debug!(count = entries.len(), "collected desktop entries");
    entries
}

fn parse_desktop_file(path: &Path) -> Option<AppEntry> {
    let content = fs::read_to_string(path).ok()?;
    let raw = parse_entry(&content)?;
    let icon_data = raw
        .icon
        .as_deref()
        .and_then(resolve_icon_path)
        .and_then(|p| icon_to_data_url(&p));
    Some(AppEntry {
        name: raw.name,
        exec: raw.exec,
        icon_data,
    })
}

struct RawEntry {
    name: String,
    exec: String,
    icon: Option<String>,
}

/// Light parse of a desktop-entry body. Returns `None` for non-entries and
/// for `NoDisplay=true` files.
fn parse_entry(content: &str) -> Option<RawEntry> {
    if !content.contains("[Desktop Entry]") {
        return None;
    }
    let mut name = None::<String>;
    let mut exec = None::<String>;
    let mut icon = None::<String>;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("NoDisplay=") && line.ends_with("true") {
            return None;
        }
        if let Some(value) = line.strip_prefix("Name=") {
            name.get_or_insert_with(|| value.to_string());
        }
        if let Some(value) = line.strip_prefix("Exec=") {
            exec.get_or_insert_with(|| value.to_string());
        }
        if let Some(value) = line.strip_prefix("Icon=") {
            icon.get_or_insert_with(|| value.to_string());
        }
    }

    Some(RawEntry {
        name: name?,
        exec: strip_exec_placeholders(&exec?),
        icon,
    })
}

/// Remove desktop-spec field codes like `%U` or `%f` from an Exec line.
pub(crate) fn strip_exec_placeholders(exec: &str) -> String {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER_RE
        .get_or_init(|| Regex::new(r"%[fFuUdDnNickvm]").expect("valid placeholder regex"));
    re.replace_all(exec, "").trim().to_string()
}

/// Icon directories checked in order, most common sizes first.
const ICON_DIRS: [&str; 5] = [
    "/usr/share/icons/hicolor/48x48/apps",
    "/usr/share/icons/hicolor/32x32/apps",
    "/usr/share/icons/hicolor/64x64/apps",
    "/usr/share/pixmaps",
    "/usr/share/icons/Adwaita/48x48/apps",
];

const ICON_EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

fn resolve_icon_path(icon_name: &str) -> Option<String> {
    if icon_name.starts_with('/') && Path::new(icon_name).exists() {
        return Some(icon_name.to_string());
    }
    for dir in &ICON_DIRS {
        for ext in &ICON_EXTENSIONS {
            let candidate = format!("{dir}/{icon_name}.{ext}");
            if Path::new(&candidate).exists() {
                return Some(candidate);
            }
        }
    }
    None
}

fn icon_mime(path: &str) -> &'static str {
    if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".xpm") {
        "image/x-xpixmap"
    } else {
        "image/png"
    }
}

fn icon_to_data_url(path: &str) -> Option<String> {
    let data = fs::read(path).ok()?;
    Some(format!(
        "data:{};base64,{}",
        icon_mime(path),
        BASE64.encode(&data)
    ))
}
