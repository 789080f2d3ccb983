use std::fmt;
use std::str::FromStr;

/// A LaTeX engine this tool knows how to invoke.
///
/// The vendored distribution ships the engines under their core binary
/// names (`pdftex`, `tex`, ...) while callers address them by the common
/// alias names (`pdflatex`, `latex`, ...); the repair pass in
/// [`crate::install::repair`] keeps the aliases present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Pdflatex,
    Latex,
    Lualatex,
    Xelatex,
}

impl Engine {
    /// Engine used when none is requested on the command line.
    pub const DEFAULT: Engine = Engine::Pdflatex;

    /// Engine retried once when the default engine fails on a font problem.
    pub const FONT_FALLBACK: Engine = Engine::Xelatex;

    pub const ALL: [Engine; 4] = [
        Engine::Pdflatex,
        Engine::Latex,
        Engine::Lualatex,
        Engine::Xelatex,
    ];

    /// The alias name callers invoke the engine by.
    pub fn name(self) -> &'static str {
        match self {
            Engine::Pdflatex => "pdflatex",
            Engine::Latex => "latex",
            Engine::Lualatex => "lualatex",
            Engine::Xelatex => "xelatex",
        }
    }

    /// The underlying binary name the distribution ships the engine under.
    pub fn base_binary(self) -> &'static str {
        match self {
            Engine::Pdflatex => "pdftex",
            Engine::Latex => "tex",
            Engine::Lualatex => "luatex",
            Engine::Xelatex => "xetex",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdflatex" => Ok(Engine::Pdflatex),
            "latex" => Ok(Engine::Latex),
            "lualatex" => Ok(Engine::Lualatex),
            "xelatex" => Ok(Engine::Xelatex),
            other => Err(format!(
                "unknown engine '{}' (expected one of: pdflatex, latex, lualatex, xelatex)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_names_round_trip() {
        for engine in Engine::ALL {
            assert_eq!(engine.name().parse::<Engine>().unwrap(), engine);
        }
    }

    #[test]
    fn test_engine_base_binaries() {
        assert_eq!(Engine::Pdflatex.base_binary(), "pdftex");
        assert_eq!(Engine::Latex.base_binary(), "tex");
        assert_eq!(Engine::Lualatex.base_binary(), "luatex");
        assert_eq!(Engine::Xelatex.base_binary(), "xetex");
    }

    #[test]
    fn test_unknown_engine_rejected() {
        let err = "tectonic".parse::<Engine>().unwrap_err();
        assert!(err.contains("tectonic"));
        assert!(err.contains("pdflatex"));
    }

    #[test]
    fn test_default_and_fallback() {
        assert_eq!(Engine::DEFAULT, Engine::Pdflatex);
        assert_eq!(Engine::FONT_FALLBACK, Engine::Xelatex);
    }
}
