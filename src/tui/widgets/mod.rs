// ABOUTME: TUI widget sub-modules for the transcript pane and the status bar.
// ABOUTME: Each widget is a pure rendering function over plain data.

pub mod status;
pub mod transcript;
