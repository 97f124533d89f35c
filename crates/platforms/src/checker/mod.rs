pub mod default;
pub mod error;
pub mod heuristics;
pub mod pacing;
pub mod platform;
pub mod platform_checker;
pub mod platforms;
pub mod registry;

pub use default::{default_client, default_registry, random_user_agent};
pub use error::CheckerError;
pub use pacing::RequestPacer;
pub use platform::Platform;
pub use platform_checker::{Checker, LiveCheck, PlatformChecker};
pub use registry::{CheckerRegistry, CheckerSettings};
