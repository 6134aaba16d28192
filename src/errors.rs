//! Error types.
//!
//! Failures of individual scoring runs are errors at the level of
//! [`ScoreTask`][task], but they never propagate to the search driver: the
//! [`TaskExecutor`][exec] counts and drops them. Engine failures, see
//! [`Error::is_task_failure`][fail], are only logged in debug mode, other
//! failures (writing the theory, reading the log) are warnings.
//!
//! [task]: ../task/struct.ScoreTask.html (ScoreTask struct)
//! [exec]: ../task/executor/struct.TaskExecutor.html (TaskExecutor struct)
//! [fail]: struct.Error.html#method.is_task_failure
//! (is_task_failure function)

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Res;
    }

    foreign_links {
        Io(::std::io::Error) #[doc = "IO error."];
    }

    errors {
        #[doc = "Parse error in a theory, at some line (starting at 1)."]
        ParseError(line: usize, msg: String) {
            description("parse error")
            display("parse error at line {}: {}", line, msg)
        }
        #[doc = "Could not spawn the inference engine."]
        EngineSpawn(cmd: String) {
            description("could not spawn the inference engine")
            display("could not spawn the inference engine `{}`", cmd)
        }
        #[doc = "An engine run was killed after reaching its time budget."]
        Timeout(secs: u64) {
            description("timeout")
            display("engine run killed after {}s", secs)
        }
        #[doc = "The output of an engine run is unusable."]
        EngineOutput(msg: String) {
            description("unusable engine output")
            display("unusable engine output: {}", msg)
        }
    }
}

impl Error {
    /// True if the kind of the error is [`ErrorKind::Timeout`][timeout].
    ///
    /// [timeout]: enum.ErrorKind.html#variant.Timeout
    /// (ErrorKind's Timeout variant)
    pub fn is_timeout(&self) -> bool {
        matches!(*self.kind(), ErrorKind::Timeout(_))
    }

    /// True if the kind of the error is [`ErrorKind::ParseError`][parse].
    ///
    /// [parse]: enum.ErrorKind.html#variant.ParseError
    /// (ErrorKind's ParseError variant)
    pub fn is_parse_error(&self) -> bool {
        matches!(*self.kind(), ErrorKind::ParseError(_, _))
    }

    /// True if the error comes from running the engine, as opposed to a
    /// problem with the input or the output directory.
    pub fn is_task_failure(&self) -> bool {
        match *self.kind() {
            ErrorKind::EngineSpawn(_) | ErrorKind::Timeout(_) | ErrorKind::EngineOutput(_) => true,
            _ => false,
        }
    }
}

/// Prints an error.
pub fn print_err(errs: &Error) {
    println!("(error \"");
    for err in errs.iter() {
        for line in format!("{}", err).lines() {
            println!("  {}", line)
        }
    }
    println!("\")")
}
