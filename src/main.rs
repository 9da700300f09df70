mod app;
mod application;
mod domain;
mod downloader;
mod ui;
mod utils;

use iced::{window, Size};
use tracing_subscriber::EnvFilter;

const ICON_SIZE: u32 = 32;

/// Downward arrow on a blue tile
fn app_icon() -> Option<window::Icon> {
    let center = ICON_SIZE as i32 / 2;
    let rgba = image::RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let (x, y) = (x as i32, y as i32);
        let shaft = (center - 3..center + 3).contains(&x) && (6..18).contains(&y);
        let head = (16..26).contains(&y) && (x - center).abs() < 26 - y;
        if shaft || head {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([33, 99, 186, 255])
        }
    });

    let (width, height) = rgba.dimensions();
    window::icon::from_rgba(rgba.into_raw(), width, height).ok()
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,simple_video_downloader=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    setup_logging();
    tracing::info!("starting");

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("Video Downloader")
        .subscription(app::subscription)
        .window(window::Settings {
            size: Size::new(720.0, 560.0),
            resizable: false,
            icon: app_icon(),
            exit_on_close_request: false,
            ..Default::default()
        })
        .run()
}
