use std::io::{self, Write};

/// Writes help or rendered output to stdout. A reader that closes the pipe
/// early (`fishkey batch big.csv | head`) is not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, true)
}

fn emit(writer: &mut dyn Write, text: &str, newline: bool) -> io::Result<()> {
    let result = writer
        .write_all(text.as_bytes())
        .and_then(|()| {
            if newline {
                writer.write_all(b"\n")
            } else {
                Ok(())
            }
        })
        .and_then(|()| writer.flush());
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
