//! User-visible messages.

use std::fs::OpenOptions;

use crate::common::*;

/// Message sink for progress reports and the final theory.
///
/// Every message is printed on stdout and appended to the message file of the
/// output directory. Failing to write the file is logged, never fatal.
#[derive(Debug, Clone)]
pub struct Reporter {
    /// Message file, `None` if reports should only be printed.
    file: Option<PathBuf>,
    /// Prints messages on stdout if true.
    print: bool,
}
impl Reporter {
    /// Constructor, messages go to `<out_dir>/output.txt` and stdout.
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        let mut file = out_dir.as_ref().to_path_buf();
        file.push(consts::message_file);
        Reporter {
            file: Some(file),
            print: true,
        }
    }

    /// Reporter that only writes to the message file.
    pub fn silent<P: AsRef<Path>>(out_dir: P) -> Self {
        let mut slf = Self::new(out_dir);
        slf.print = false;
        slf
    }

    /// Path to the message file, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_ref().map(|path| path.as_path())
    }

    /// Reports a message.
    pub fn report<S: AsRef<str>>(&self, msg: S) {
        let msg = msg.as_ref();
        if self.print {
            println!("{}", msg)
        }
        if let Some(path) = self.file.as_ref() {
            if let Err(e) = Self::append(path, msg) {
                warn!(
                    "failed to append message to `{}`: {}",
                    path.to_string_lossy(),
                    e
                )
            }
        }
    }

    /// Appends a message to a file.
    fn append(path: &Path, msg: &str) -> Res<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", msg)?;
        Ok(())
    }
}
