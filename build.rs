use std::process::Command;

fn get_revision() -> Option<String> {
    if let Ok(out) = Command::new("git")
        .args(&["rev-parse", "--verify", "HEAD"])
        .output()
    {
        if out.status.success() {
            return Some(String::from_utf8_lossy(&out.stdout).trim().to_string());
        }
    }
    None
}

fn main() {
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::path::PathBuf;

    let mut path = PathBuf::from(std::env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    path.push("revision.rs");

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
        .expect("while opening revision file");
    let revision = if let Some(rev) = get_revision() {
        format!("Some(\"{}\")", rev)
    } else {
        "None".to_string()
    };
    file.write_fmt(format_args!(
        "/// The current revision.\n\
         pub const REVISION: Option<&str> = {};\n",
        revision
    ))
    .expect("while writing revision file");
    file.flush().expect("while flushing revision file");

    println!("cargo:rerun-if-changed=.git/HEAD");
}
