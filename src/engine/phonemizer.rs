use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};

/// Marks that close a clause and are kept in the phoneme stream
const CLAUSE_PUNCTUATION: &[char] = &[',', '.', '!', '?', ';', ':'];

/// Turns plain text into IPA phonemes.
pub trait Phonemizer: Send {
    fn phonemize(&self, text: &str, language: &str) -> Result<String>;
}

/// Runs the `espeak-ng` (or `espeak`) executable.
#[derive(Debug, Clone)]
pub struct EspeakPhonemizer {
    program: String,
}

impl EspeakPhonemizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// One espeak run over a clause without its closing punctuation.
    fn run(&self, clause: &str, language: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .args(espeak_args(clause, language))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| {
                format!(
                    "Failed to run phonemizer '{}', is it installed?",
                    self.program
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("Phonemizer '{}' failed: {}", self.program, stderr.trim());
        }

        let phonemes = String::from_utf8(output.stdout)
            .context("Phonemizer emitted non-utf8 output")?;
        Ok(join_lines(&phonemes))
    }
}

impl Phonemizer for EspeakPhonemizer {
    fn phonemize(&self, text: &str, language: &str) -> Result<String> {
        let mut pieces: Vec<String> = Vec::new();
        for (clause, punctuation) in split_clauses(text) {
            if !clause.is_empty() {
                let phonemes = self.run(clause, language)?;
                if !phonemes.is_empty() {
                    pieces.push(phonemes + &punctuation);
                    continue;
                }
            }
            if let Some(last) = pieces.last_mut() {
                last.push_str(&punctuation);
            }
        }

        let phonemes = pieces.join(" ");
        if phonemes.is_empty() {
            bail!("Phonemizer '{}' returned no phonemes", self.program);
        }
        Ok(phonemes)
    }
}

/// Text goes after `--` so a leading dash is never read as an option
fn espeak_args<'a>(text: &'a str, language: &'a str) -> [&'a str; 6] {
    ["-q", "--ipa", "-v", language, "--", text]
}

/// Split at clause punctuation followed by whitespace or the end of text.
/// Each clause is paired with the run of marks that closed it.
fn split_clauses(text: &str) -> Vec<(&str, String)> {
    let mut clauses = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !CLAUSE_PUNCTUATION.contains(&c) {
            continue;
        }
        let mut marks = String::from(c);
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !CLAUSE_PUNCTUATION.contains(&next) {
                break;
            }
            marks.push(next);
            end = j + next.len_utf8();
            chars.next();
        }
        let at_boundary = match chars.peek() {
            Some(&(_, next)) => next.is_whitespace(),
            None => true,
        };
        if at_boundary {
            clauses.push((text[start..i].trim(), marks));
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        clauses.push((tail, String::new()));
    }
    clauses
}

/// espeak prints one line per clause
fn join_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_lines_are_joined() {
        assert_eq!(join_lines(" həlˈoʊ\n\n wˈɜːld \n"), "həlˈoʊ wˈɜːld");
        assert_eq!(join_lines("\n"), "");
    }

    #[test]
    fn clauses_keep_their_punctuation() {
        assert_eq!(
            split_clauses("Hello, world! How are you?"),
            vec![
                ("Hello", ",".to_string()),
                ("world", "!".to_string()),
                ("How are you", "?".to_string()),
            ]
        );
        assert_eq!(
            split_clauses("Wait... what?! ok"),
            vec![
                ("Wait", "...".to_string()),
                ("what", "?!".to_string()),
                ("ok", String::new()),
            ]
        );
    }

    #[test]
    fn inner_dots_do_not_split() {
        assert_eq!(
            split_clauses("It costs 3.5 dollars at example.com today."),
            vec![("It costs 3.5 dollars at example.com today", ".".to_string())]
        );
        assert!(split_clauses("  ").is_empty());
    }

    #[test]
    fn text_is_never_parsed_as_options() {
        let args = espeak_args("-w out.wav hello", "en-us");
        assert_eq!(args, ["-q", "--ipa", "-v", "en-us", "--", "-w out.wav hello"]);
    }

    #[cfg(unix)]
    fn fake_espeak(dir: &std::path::Path) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        // Echoes the clause only when it arrives after the option terminator
        let script = dir.join("fake-espeak");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             while [ \"$#\" -gt 0 ]; do\n\
             if [ \"$1\" = \"--\" ]; then shift; printf '%s\\n' \"$1\"; exit 0; fi\n\
             case \"$1\" in -v) shift ;; -*) ;; *) echo \"stray argument: $1\" >&2; exit 1 ;; esac\n\
             shift\n\
             done\n\
             exit 1\n",
        )
        .unwrap();
        let mut perms = std::fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script, perms).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn leading_dash_text_reaches_the_phonemizer_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let p = EspeakPhonemizer::new(fake_espeak(dir.path()).to_string_lossy());
        assert_eq!(p.phonemize("-5 degrees", "en-us").unwrap(), "-5 degrees");
        assert_eq!(
            p.phonemize("-w out.wav, then stop.", "en-us").unwrap(),
            "-w out.wav, then stop."
        );
        assert!(!dir.path().join("out.wav").exists());
    }

    #[test]
    fn missing_program_is_an_error() {
        let p = EspeakPhonemizer::new("definitely-not-an-espeak-binary");
        let err = p.phonemize("hello", "en-us").unwrap_err();
        assert!(err.to_string().contains("definitely-not-an-espeak-binary"));
    }
}
