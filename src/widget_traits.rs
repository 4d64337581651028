/// Trait for widgets that can provide debug information
///
/// Widgets implement this so the console can dump their state into the log
/// when something looks off.
pub trait DebugInfoProvider {
    /// Generate a formatted string containing debug information about the widget's state
    ///
    /// The output should be human-readable and start with the widget name as a header.
    fn debug_info(&self) -> String;

    /// Optional: Get a short one-line summary of the widget state
    fn debug_summary(&self) -> String {
        "No summary available".to_string()
    }
}
