pub mod kick;
pub mod tiktok;
pub mod twitch;
pub mod youtube;

pub use kick::KickChecker;
pub use tiktok::TikTokChecker;
pub use twitch::TwitchChecker;
pub use youtube::YoutubeChecker;
