// i18n.rs
//
// Runtime string tables:
// - assets/i18n/<lang>.json next to the executable, or under the working dir
// - lookup order: selected lang -> en -> built-in English -> key itself
// - tr("key") / tr_with("key", &[("name", ..)]) with {name} placeholders
//
// The language code comes from PlayerConfig (--lang / VR_PLAYER_LANG / config file).

use once_cell::sync::{Lazy, OnceCell};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

pub const FALLBACK_LANG: &str = "en";

/// (code, native name) pairs offered in the Language menu.
pub const LANGUAGES: [(&str, &str); 4] = [
    ("en", "English"),
    ("zh-Hans", "简体中文"),
    ("ja", "日本語"),
    ("fr", "Français"),
];

static BUILTIN: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let text = include_str!("../assets/i18n/en.json");
    serde_json::from_str(text).unwrap_or_default()
});

#[derive(Debug, Clone)]
pub struct I18n {
    pub lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(map) => Some(map),
        Err(e) => {
            log::warn!("skipping {}: {}", path.display(), e);
            None
        }
    }
}

/// <exe_dir>/assets/i18n/<lang>.json, then ./assets/i18n/<lang>.json
fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let file = format!("{}.json", lang);

    let mut dirs = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            dirs.push(dir.to_path_buf());
        }
    }
    dirs.push(PathBuf::new());

    for dir in dirs {
        let path = dir.join("assets").join("i18n").join(&file);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    let map = find_lang_file(lang).and_then(|p| load_json_map(&p));
    map.unwrap_or_default()
}

/// Safe to call again to switch language.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();

    let map = load_lang(&lang);
    let fallback_map = if lang == FALLBACK_LANG {
        map.clone()
    } else {
        load_lang(FALLBACK_LANG)
    };

    let i = I18n {
        lang,
        map,
        fallback_map,
    };

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

pub fn current_lang() -> String {
    I18N.get()
        .and_then(|l| l.read().ok().map(|i| i.lang.clone()))
        .unwrap_or_else(|| FALLBACK_LANG.to_string())
}

/// Localized text for `key`, or the key itself when nothing matches.
pub fn tr(key: &str) -> String {
    if let Some(i) = I18N.get().and_then(|l| l.read().ok()) {
        if let Some(v) = i.map.get(key).or_else(|| i.fallback_map.get(key)) {
            return v.clone();
        }
    }
    BUILTIN.get(key).cloned().unwrap_or_else(|| key.to_string())
}

/// `tr` plus `{name}` substitution; unknown placeholders stay as-is.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    let mut s = tr(key);
    for (k, v) in args {
        let placeholder = format!("{{{}}}", k);
        s = s.replace(&placeholder, v);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_english_is_available() {
        assert_eq!(tr("control.play"), "Play");
        assert_eq!(tr("no.such.key"), "no.such.key");
    }

    #[test]
    fn placeholders_are_substituted() {
        let s = tr_with("log.rejected_drop", &[("path", "a.txt".to_string())]);
        assert!(s.contains("a.txt"));
        assert!(!s.contains("{path}"));
    }
}
