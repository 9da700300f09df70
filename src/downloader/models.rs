use std::ffi::OsString;
use std::path::PathBuf;

/// Step run by the downloader after the media has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    /// Transcode to an audio-only file. `quality` is a bitrate in kbps.
    ExtractAudio { codec: String, quality: String },
}

/// Per-request configuration handed to a [`Downloader`](super::Downloader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub format: String,
    pub output_template: PathBuf,
    pub post_processors: Vec<PostProcessor>,
}

impl DownloadOptions {
    pub fn extracts_audio(&self) -> bool {
        self.post_processors
            .iter()
            .any(|p| matches!(p, PostProcessor::ExtractAudio { .. }))
    }

    /// Command-line arguments for yt-dlp, not including the URL.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--no-color".into(),
            "--no-playlist".into(),
            "--no-progress".into(),
            "-f".into(),
            self.format.clone().into(),
            "-o".into(),
            self.output_template.clone().into_os_string(),
        ];

        for post_processor in &self.post_processors {
            match post_processor {
                PostProcessor::ExtractAudio { codec, quality } => {
                    args.push("-x".into());
                    args.push("--audio-format".into());
                    args.push(codec.into());
                    args.push("--audio-quality".into());
                    args.push(format!("{}K", quality).into());
                }
            }
        }

        args
    }
}

/// Configuration for the downloader and the options built for it
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    pub program: PathBuf,
    pub format: String,
    pub audio_codec: String,
    pub audio_quality: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            format: "best".to_string(),
            audio_codec: "mp3".to_string(),
            audio_quality: "320".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_as_strings(options: &DownloadOptions) -> Vec<String> {
        options
            .to_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_video_args_have_no_audio_flags() {
        let options = DownloadOptions {
            format: "best".to_string(),
            output_template: PathBuf::from("out/video_1_%(title)s.%(ext)s"),
            post_processors: Vec::new(),
        };

        let args = args_as_strings(&options);
        assert!(!options.extracts_audio());
        assert!(!args.contains(&"-x".to_string()));
        assert_eq!(
            args,
            vec![
                "--no-color",
                "--no-playlist",
                "--no-progress",
                "-f",
                "best",
                "-o",
                "out/video_1_%(title)s.%(ext)s",
            ]
        );
    }

    #[test]
    fn test_audio_args() {
        let options = DownloadOptions {
            format: "best".to_string(),
            output_template: PathBuf::from("video_2_%(title)s.%(ext)s"),
            post_processors: vec![PostProcessor::ExtractAudio {
                codec: "mp3".to_string(),
                quality: "320".to_string(),
            }],
        };

        let args = args_as_strings(&options);
        assert!(options.extracts_audio());
        assert!(args.ends_with(&[
            "-x".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            "320K".to_string(),
        ]));
    }
}
