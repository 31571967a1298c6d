//! Commands handled without a shell.

use std::path::Path;

use core_text::expand_vars;

use crate::workdir::Workdir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    /// `cd [dir]`; no argument means the home directory.
    Cd(Option<String>),
    Exit,
}

const OPERATORS: &[char] = &['|', '&', '<', '>', ';'];

impl Builtin {
    /// Recognise a built-in from the tokens of an accepted line. A `cd`
    /// inside a compound command is left to the shell.
    pub fn parse(tokens: &[String]) -> Option<Self> {
        let first = tokens.first()?;
        if first.eq_ignore_ascii_case("exit") {
            return Some(Self::Exit);
        }
        if first.eq_ignore_ascii_case("cd")
            && !tokens.iter().any(|t| t.starts_with(OPERATORS))
        {
            return Some(Self::Cd(tokens.get(1).cloned()));
        }
        None
    }
}

/// Change directory the way the `cd` built-in does. The error is the text
/// shown to the user.
pub fn change_dir(
    workdir: &mut dyn Workdir,
    arg: Option<&str>,
    home: Option<&Path>,
) -> Result<(), String> {
    let home_str = home.map(|h| h.to_string_lossy().into_owned());
    let target = match arg {
        None => home_str
            .clone()
            .ok_or_else(|| "cd: no home directory".to_string())?,
        Some(arg) => {
            let arg = arg.trim_matches('"').trim();
            let trimmed = arg.trim_end_matches(['/', '\\']);
            // Keep roots ("/", "C:\") intact.
            let arg = if trimmed.is_empty() || trimmed.ends_with(':') {
                arg
            } else {
                trimmed
            };
            expand_vars(arg, |name| std::env::var(name).ok(), home_str.as_deref())
        }
    };
    workdir
        .change(Path::new(&target))
        .map_err(|e| format!("cd: {target}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    fn tokens(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    struct Recorder(PathBuf);

    impl Workdir for Recorder {
        fn current(&self) -> &Path {
            &self.0
        }
        fn change(&mut self, target: &Path) -> io::Result<()> {
            if target.as_os_str() == "missing" {
                return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
            }
            self.0 = self.0.join(target);
            Ok(())
        }
    }

    #[test]
    fn recognises_builtins() {
        assert_eq!(Builtin::parse(&tokens(&["exit"])), Some(Builtin::Exit));
        assert_eq!(Builtin::parse(&tokens(&["CD"])), Some(Builtin::Cd(None)));
        assert_eq!(
            Builtin::parse(&tokens(&["cd", "src"])),
            Some(Builtin::Cd(Some("src".into())))
        );
        assert_eq!(Builtin::parse(&tokens(&["cd", "src", "&&", "ls"])), None);
        assert_eq!(Builtin::parse(&tokens(&["ls"])), None);
        assert_eq!(Builtin::parse(&[]), None);
    }

    #[test]
    fn cd_strips_quotes_and_trailing_separators() {
        let mut w = Recorder(PathBuf::from("/base"));
        change_dir(&mut w, Some("\"My Docs/\""), None).unwrap();
        assert_eq!(w.current(), Path::new("/base/My Docs"));
    }

    #[test]
    fn cd_without_argument_goes_home() {
        let mut w = Recorder(PathBuf::from("/base"));
        change_dir(&mut w, None, Some(Path::new("/home/ada"))).unwrap();
        assert_eq!(w.current(), Path::new("/home/ada"));
        assert!(change_dir(&mut w, None, None).is_err());
    }

    #[test]
    fn cd_reports_failures() {
        let mut w = Recorder(PathBuf::from("/base"));
        let err = change_dir(&mut w, Some("missing"), None).unwrap_err();
        assert_eq!(err, "cd: missing: not found");
        assert_eq!(w.current(), Path::new("/base"));
    }
}
