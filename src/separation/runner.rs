//! Child process execution with live output relay
//!
//! stdout and stderr share one pipe, so lines reach the caller in the order
//! the child wrote them.

use super::command::SeparationCommand;
use std::io::{self, BufRead, BufReader, Read};
use std::process::Stdio;
use tracing::debug;

/// Launches a command and relays its output line by line
pub trait ProcessRunner: Send + Sync {
    /// Run `command` to completion, calling `on_line` for every output line
    /// as it is produced. Returns the exit code (`None` if killed by a signal).
    fn run_streaming(
        &self,
        command: &SeparationCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> io::Result<Option<i32>>;
}

/// Runner that spawns real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run_streaming(
        &self,
        command: &SeparationCommand,
        on_line: &mut dyn FnMut(&str),
    ) -> io::Result<Option<i32>> {
        let (reader, writer) = io::pipe()?;

        let mut cmd = command.to_command();
        cmd.stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        let mut child = cmd.spawn()?;
        // The parent's copies of the write end live in `cmd`; EOF only
        // arrives once they are closed.
        drop(cmd);
        debug!("Spawned pid {} for {}", child.id(), command);

        forward_lines(reader, on_line);

        let status = child.wait()?;
        debug!("Child exited with {:?}", status.code());
        Ok(status.code())
    }
}

/// Split a byte stream into lines and hand each one to `on_line`
///
/// `\n`, `\r\n` and a lone `\r` all end a line, so carriage-return progress
/// bars are relayed as they update. Invalid UTF-8 is replaced.
pub fn forward_lines<R: Read>(reader: R, on_line: &mut dyn FnMut(&str)) {
    let mut reader = BufReader::new(reader);
    let mut line: Vec<u8> = Vec::new();
    let mut after_cr = false;

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Stopped reading child output: {}", e);
                break;
            }
        };
        if buf.is_empty() {
            break;
        }

        let len = buf.len();
        for &byte in buf {
            match byte {
                b'\n' if after_cr => after_cr = false,
                b'\r' | b'\n' => {
                    after_cr = byte == b'\r';
                    on_line(&String::from_utf8_lossy(&line));
                    line.clear();
                }
                _ => {
                    after_cr = false;
                    line.push(byte);
                }
            }
        }
        reader.consume(len);
    }

    if !line.is_empty() {
        on_line(&String::from_utf8_lossy(&line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        forward_lines(Cursor::new(input.to_vec()), &mut |line| lines.push(line.to_string()));
        lines
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(collect(b"a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_blank_lines_kept() {
        assert_eq!(collect(b"a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let lines = collect(b"ok \xff\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ok "));
        assert!(lines[0].contains('\u{FFFD}'));
    }

    #[test]
    fn test_progress_bar_updates() {
        let lines = collect(b" 10%|#   |\r 50%|##  |\r100%|####|\n");
        assert_eq!(lines, vec![" 10%|#   |", " 50%|##  |", "100%|####|"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_merges_stdout_and_stderr() {
        let cmd = SeparationCommand::new(
            "sh",
            ["-c", "echo to-stdout; echo to-stderr 1>&2; exit 3"],
        );
        let mut lines = Vec::new();
        let code = SystemRunner
            .run_streaming(&cmd, &mut |line| lines.push(line.to_string()))
            .unwrap();

        assert_eq!(code, Some(3));
        assert_eq!(lines, vec!["to-stdout", "to-stderr"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_interleaved_writes_keep_order() {
        let script = "i=1; while [ $i -le 40 ]; do echo o$i; echo e$i 1>&2; i=$((i+1)); done";
        let expected: Vec<String> = (1..=40)
            .flat_map(|i| [format!("o{}", i), format!("e{}", i)])
            .collect();

        for _ in 0..20 {
            let cmd = SeparationCommand::new("sh", ["-c", script]);
            let mut lines = Vec::new();
            let code = SystemRunner
                .run_streaming(&cmd, &mut |line| lines.push(line.to_string()))
                .unwrap();

            assert_eq!(code, Some(0));
            assert_eq!(lines, expected);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_success_exit_code() {
        let cmd = SeparationCommand::new("sh", ["-c", "printf 'one\\ntwo\\n'"]);
        let mut lines = Vec::new();
        let code = SystemRunner
            .run_streaming(&cmd, &mut |line| lines.push(line.to_string()))
            .unwrap();

        assert_eq!(code, Some(0));
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let cmd = SeparationCommand::new("/nonexistent/song-splitter-test/demucs", ["--help"]);
        let err = SystemRunner.run_streaming(&cmd, &mut |_| {}).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
