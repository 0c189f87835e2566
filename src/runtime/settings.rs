use std::env;
use std::path::PathBuf;

use crate::config;

/// Load settings, falling back to defaults. The second value describes why
/// the fallback happened; it is logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

/// Library root: first CLI argument, then the configured root, then
/// `$HOME/Music`, then the current directory.
pub fn resolve_root(cli_arg: Option<String>, settings: &config::LibrarySettings) -> PathBuf {
    cli_arg
        .map(PathBuf::from)
        .or_else(|| settings.root.clone())
        .or_else(|| {
            env::var_os("HOME")
                .map(|home| PathBuf::from(home).join("Music"))
                .filter(|p| p.is_dir())
        })
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let settings = config::LibrarySettings {
            root: Some(PathBuf::from("/configured")),
            ..config::LibrarySettings::default()
        };
        assert_eq!(
            resolve_root(Some("/from/cli".into()), &settings),
            PathBuf::from("/from/cli")
        );
    }

    #[test]
    fn configured_root_beats_fallbacks() {
        let settings = config::LibrarySettings {
            root: Some(PathBuf::from("/configured")),
            ..config::LibrarySettings::default()
        };
        assert_eq!(resolve_root(None, &settings), PathBuf::from("/configured"));
    }
}
