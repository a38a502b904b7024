//! Browser automation module
//!
//! Headless Chromium plumbing for the scripted browser tier: scoped
//! sessions, navigation with settle, and automation marker masking.

pub mod controller;
pub mod navigation;
pub mod stealth;

pub use controller::{BrowserConfig, BrowserSession, DESKTOP_VIEWPORT};
pub use navigation::{NavigationOptions, PageNavigator, WaitUntil};
pub use stealth::StealthMode;
