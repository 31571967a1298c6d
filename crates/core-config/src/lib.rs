//! Configuration loading and parsing.
//!
//! `oxcmd.toml` is discovered in the working directory first and then in the
//! platform config dir. Additional files (the `-i` flag) are layered on top by
//! deep-merging TOML tables before deserialization, so a layer only needs to
//! name the keys it overrides. Unknown fields are ignored; a file that fails
//! to parse is skipped with a warning and the remaining layers still apply.
//!
//! The heuristic constants of the completion pager (column padding, the
//! multi-column threshold and the confirmation ratio) live here as plain
//! parameters rather than hard-coded invariants.

use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub mod color;
pub mod paths;

pub use color::{ColorName, ColorSpec, ConfigError, Shade};
pub use paths::DataPaths;

const FILE_NAME: &str = "oxcmd.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: Self::default_max_entries(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_entries() -> usize {
        1000
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirHistoryConfig {
    #[serde(default = "DirHistoryConfig::default_max_entries")]
    pub max_entries: usize,
}

impl Default for DirHistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: Self::default_max_entries(),
        }
    }
}

impl DirHistoryConfig {
    const fn default_max_entries() -> usize {
        30
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditingConfig {
    #[serde(default = "EditingConfig::default_word_separators")]
    pub word_separators: String,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            word_separators: Self::default_word_separators(),
        }
    }
}

impl EditingConfig {
    fn default_word_separators() -> String {
        " \t/\\.,;:=\"'|&<>".to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompletionConfig {
    #[serde(default = "CompletionConfig::default_column_padding")]
    pub column_padding: usize,
    #[serde(default = "CompletionConfig::default_multi_column_divisor")]
    pub multi_column_divisor: usize,
    #[serde(default = "CompletionConfig::default_confirm_screens")]
    pub confirm_screens: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            column_padding: Self::default_column_padding(),
            multi_column_divisor: Self::default_multi_column_divisor(),
            confirm_screens: Self::default_confirm_screens(),
        }
    }
}

impl CompletionConfig {
    const fn default_column_padding() -> usize {
        10
    }
    const fn default_multi_column_divisor() -> usize {
        4
    }
    const fn default_confirm_screens() -> f32 {
        0.9
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub quiet: bool,
    #[serde(default = "BehaviorConfig::default_notify_after_secs")]
    pub notify_after_secs: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            notify_after_secs: Self::default_notify_after_secs(),
        }
    }
}

impl BehaviorConfig {
    const fn default_notify_after_secs() -> u64 {
        15
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ColorsConfig {
    #[serde(default = "ColorsConfig::default_prompt")]
    pub prompt: ColorSpec,
    #[serde(default)]
    pub text: ColorSpec,
    #[serde(default = "ColorsConfig::default_selection")]
    pub selection: ColorSpec,
    #[serde(default = "ColorsConfig::default_search_filter")]
    pub search_filter: ColorSpec,
    #[serde(default = "ColorsConfig::default_completion_match")]
    pub completion_match: ColorSpec,
    #[serde(default = "ColorsConfig::default_dir_history")]
    pub dir_history: ColorSpec,
    #[serde(default = "ColorsConfig::default_dir_history_selected")]
    pub dir_history_selected: ColorSpec,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            prompt: Self::default_prompt(),
            text: ColorSpec::default(),
            selection: Self::default_selection(),
            search_filter: Self::default_search_filter(),
            completion_match: Self::default_completion_match(),
            dir_history: Self::default_dir_history(),
            dir_history_selected: Self::default_dir_history_selected(),
        }
    }
}

impl ColorsConfig {
    fn default_prompt() -> ColorSpec {
        ColorSpec::fg(Shade::bright(ColorName::Yellow))
    }
    fn default_selection() -> ColorSpec {
        ColorSpec::fg_on_bg(
            Shade::normal(ColorName::Black),
            Shade::normal(ColorName::White),
        )
    }
    fn default_search_filter() -> ColorSpec {
        ColorSpec::fg_on_bg(
            Shade::normal(ColorName::Black),
            Shade::bright(ColorName::Green),
        )
    }
    fn default_completion_match() -> ColorSpec {
        ColorSpec::fg(Shade::bright(ColorName::Green))
    }
    fn default_dir_history() -> ColorSpec {
        ColorSpec::fg(Shade::normal(ColorName::White))
    }
    fn default_dir_history_selected() -> ColorSpec {
        ColorSpec::fg_on_bg(
            Shade::bright(ColorName::White),
            Shade::normal(ColorName::Blue),
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    /// Prompt template; `{cwd}` expands to the working directory.
    #[serde(default = "AppearanceConfig::default_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub colors: ColorsConfig,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            prompt: Self::default_prompt(),
            colors: ColorsConfig::default(),
        }
    }
}

impl AppearanceConfig {
    fn default_prompt() -> String {
        "{cwd}> ".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub dir_history: DirHistoryConfig,
    #[serde(default)]
    pub editing: EditingConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Files that were read successfully, in application order.
    pub layers: Vec<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxcmd").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

/// Load a single configuration file (or the discovered one).
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    load_layers(path, &[])
}

/// Load the base file followed by `extra` layers; later layers override
/// earlier ones key by key. Missing files are silently skipped.
pub fn load_layers(base: Option<PathBuf>, extra: &[PathBuf]) -> Result<Config> {
    let base = base.unwrap_or_else(discover);
    let mut merged = toml::Table::new();
    let mut layers = Vec::new();
    for path in std::iter::once(&base).chain(extra.iter()) {
        if let Some(table) = read_table(path) {
            merge_tables(&mut merged, table);
            layers.push(path.clone());
        }
    }
    let file = match toml::Value::Table(merged).try_into::<ConfigFile>() {
        Ok(file) => file,
        Err(e) => {
            warn!(target: "config", error = %e, "config_invalid_using_defaults");
            ConfigFile::default()
        }
    };
    info!(target: "config", layers = layers.len(), "config_loaded");
    Ok(Config { layers, file })
}

fn read_table(path: &Path) -> Option<toml::Table> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!(target: "config", file = %path.display(), error = %e, "config_parse_failed");
            None
        }
    }
}

/// Deep merge `overlay` into `base`; nested tables merge, other values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.layers.is_empty());
        assert_eq!(cfg.file.history.max_entries, 1000);
        assert_eq!(cfg.file.dir_history.max_entries, 30);
        assert_eq!(cfg.file.completion.column_padding, 10);
        assert_eq!(cfg.file.completion.multi_column_divisor, 4);
        assert!((cfg.file.completion.confirm_screens - 0.9).abs() < f32::EPSILON);
        assert_eq!(cfg.file.behavior.notify_after_secs, 15);
        assert!(!cfg.file.behavior.quiet);
        assert_eq!(cfg.file.appearance.prompt, "{cwd}> ");
    }

    #[test]
    fn parses_history_caps() {
        let tmp = write_tmp("[history]\nmax_entries = 50\n[dir_history]\nmax_entries = 5\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.history.max_entries, 50);
        assert_eq!(cfg.file.dir_history.max_entries, 5);
    }

    #[test]
    fn parses_colors() {
        let tmp = write_tmp(
            "[appearance.colors]\nprompt = \"bright-cyan\"\nselection = \"white on red\"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let colors = &cfg.file.appearance.colors;
        assert_eq!(colors.prompt, ColorSpec::fg(Shade::bright(ColorName::Cyan)));
        assert_eq!(
            colors.selection,
            ColorSpec::fg_on_bg(Shade::normal(ColorName::White), Shade::normal(ColorName::Red))
        );
        // untouched keys keep their defaults
        assert_eq!(
            colors.completion_match,
            ColorSpec::fg(Shade::bright(ColorName::Green))
        );
    }

    #[test]
    fn later_layers_override_only_named_keys() {
        let base = write_tmp("[history]\nmax_entries = 10\n[behavior]\nquiet = true\n");
        let extra = write_tmp("[history]\nmax_entries = 20\n");
        let cfg =
            load_layers(Some(base.path().to_path_buf()), &[extra.path().to_path_buf()]).unwrap();
        assert_eq!(cfg.layers.len(), 2);
        assert_eq!(cfg.file.history.max_entries, 20);
        assert!(cfg.file.behavior.quiet);
    }

    #[test]
    fn bad_color_falls_back_to_defaults_with_warning() {
        let tmp = write_tmp("[appearance.colors]\nprompt = \"chartreuse\"\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || {
            load_from(Some(tmp.path().to_path_buf())).unwrap()
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_invalid_using_defaults"));
        assert_eq!(
            cfg.file.appearance.colors.prompt,
            ColorSpec::fg(Shade::bright(ColorName::Yellow))
        );
    }

    #[test]
    fn unparsable_layer_is_skipped() {
        let base = write_tmp("[history]\nmax_entries = 7\n");
        let broken = write_tmp("[history\nmax_entries = ");
        let cfg =
            load_layers(Some(base.path().to_path_buf()), &[broken.path().to_path_buf()]).unwrap();
        assert_eq!(cfg.layers.len(), 1);
        assert_eq!(cfg.file.history.max_entries, 7);
    }
}
