//! Prompt template expansion.

use std::path::Path;

/// `path` as shown to the user, with the home directory collapsed to `~`.
pub fn display_path(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", std::path::MAIN_SEPARATOR, rest.display());
    }
    path.display().to_string()
}

/// Replace `{cwd}` in `template`. Color tokens in the template pass through.
pub fn render_prompt(template: &str, cwd: &Path, home: Option<&Path>) -> String {
    template.replace("{cwd}", &display_path(cwd, home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn home_collapses_to_tilde() {
        let home = PathBuf::from("/home/ada");
        assert_eq!(display_path(&home, Some(&home)), "~");
        let sub = home.join("src");
        assert_eq!(
            display_path(&sub, Some(&home)),
            format!("~{}src", std::path::MAIN_SEPARATOR)
        );
        assert_eq!(display_path(Path::new("/tmp"), Some(&home)), "/tmp");
        assert_eq!(display_path(Path::new("/tmp"), None), "/tmp");
    }

    #[test]
    fn template_substitution() {
        let p = render_prompt("[{cwd}]$ ", Path::new("/srv"), None);
        assert_eq!(p, "[/srv]$ ");
        assert_eq!(render_prompt("> ", Path::new("/srv"), None), "> ");
    }
}
