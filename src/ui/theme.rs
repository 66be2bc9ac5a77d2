//! Color theme constants for the Scout UI.

use ratatui::style::Color;

/// Primary border color
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Brand accent - teal, used for highlights and the selected row
pub const COLOR_ACCENT: Color = Color::Rgb(102, 209, 186); // #66d1ba

/// Header / title color - gold
pub const COLOR_HEADER: Color = Color::Rgb(218, 175, 27); // #daaf1b

/// Dim text for secondary info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Engage recommendation - green
pub const COLOR_ENGAGE: Color = Color::LightGreen;

/// Skip recommendation - gray
pub const COLOR_SKIP: Color = Color::Gray;

/// Ignored posts and warnings - orange
pub const COLOR_IGNORED: Color = Color::Rgb(255, 140, 0); // #ff8c00

/// Running scheduler / active crawl item
pub const COLOR_ACTIVE: Color = Color::LightGreen;

/// Paused crawl item
pub const COLOR_PAUSED: Color = Color::Yellow;

/// Error status line
pub const COLOR_ERROR: Color = Color::Red;
