//! Commands for the storyboard pipeline.

use storyframe_core::command::Command;
use storyframe_core::storyboard::StoryboardRequest;
use uuid::Uuid;

/// Command to generate a storyboard from a script.
#[derive(Debug, Clone)]
pub struct GenerateStoryboard {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The validated request.
    pub request: StoryboardRequest,
}

impl Command for GenerateStoryboard {
    fn command_type(&self) -> &'static str {
        "storyboard.generate"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
