use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use super::models::{DownloadOptions, DownloaderConfig};
use super::{Downloader, DownloaderError, Result};
use crate::utils::last_error_line;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Runs the `yt-dlp` program once per request.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(config: &DownloaderConfig) -> Self {
        Self {
            program: config.program.clone(),
        }
    }

    fn command(&self, url: &str, options: &DownloadOptions) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(options.to_args())
            .arg("--")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        command
    }
}

impl Downloader for YtDlp {
    fn download(&self, url: &str, options: &DownloadOptions) -> Result<()> {
        let mut command = self.command(url, options);
        debug!(
            program = %self.program.display(),
            audio = options.extracts_audio(),
            ?command,
            "spawning downloader"
        );

        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                DownloaderError::NotInstalled(self.program.display().to_string())
            }
            _ => DownloaderError::Io(e),
        })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = last_error_line(&stderr).unwrap_or_else(|| {
            format!("{} exited with {}", self.program.display(), output.status)
        });
        Err(DownloaderError::Failed(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> DownloadOptions {
        DownloadOptions {
            format: "best".to_string(),
            output_template: PathBuf::from("video_1_%(title)s.%(ext)s"),
            post_processors: Vec::new(),
        }
    }

    #[test]
    fn test_command_ends_with_url() {
        let ytdlp = YtDlp::new(&DownloaderConfig::default());
        let command = ytdlp.command("https://example.com/watch?v=-abc", &options());

        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(command.get_program(), "yt-dlp");
        assert_eq!(
            &args[args.len() - 2..],
            &["--".to_string(), "https://example.com/watch?v=-abc".to_string()]
        );
    }

    #[test]
    fn test_missing_program() {
        let config = DownloaderConfig {
            program: PathBuf::from("/nonexistent/dir/yt-dlp-missing"),
            ..Default::default()
        };
        let result = YtDlp::new(&config).download("https://example.com", &options());
        assert!(matches!(result, Err(DownloaderError::NotInstalled(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_fake_program() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let write_script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        let args_file = dir.path().join("args.txt");
        let ok = write_script(
            "ok",
            &format!(
                "echo \"$@\" > '{}'\n\
                 i=0; while [ $i -lt 2000 ]; do echo \"[download] $i%\"; i=$((i+1)); done",
                args_file.display()
            ),
        );
        let failing = write_script(
            "failing",
            "echo '[generic] Extracting URL' >&2\n\
             echo 'ERROR: [generic] Unsupported URL: nope' >&2\n\
             exit 1",
        );

        let config = DownloaderConfig {
            program: ok,
            ..Default::default()
        };
        YtDlp::new(&config)
            .download("https://example.com/a", &options())
            .unwrap();
        let recorded = std::fs::read_to_string(&args_file).unwrap();
        assert!(recorded.contains("--no-progress"));
        assert!(recorded.contains("-f best"));
        assert!(recorded.trim_end().ends_with("-- https://example.com/a"));

        let config = DownloaderConfig {
            program: failing,
            ..Default::default()
        };
        let error = YtDlp::new(&config)
            .download("nope", &options())
            .unwrap_err();
        assert_eq!(error.to_string(), "[generic] Unsupported URL: nope");
    }
}
