use std::fmt;

/// Stages of a generation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationStage {
    Outline,
    Draft,
    ImageSearch,
    Publish,
}

impl GenerationStage {
    pub const ALL: [GenerationStage; 4] = [
        GenerationStage::Outline,
        GenerationStage::Draft,
        GenerationStage::ImageSearch,
        GenerationStage::Publish,
    ];

    /// Step id under which this stage appears in the progress snapshot.
    pub fn step_id(&self) -> &'static str {
        match self {
            GenerationStage::Outline => "outline",
            GenerationStage::Draft => "draft",
            GenerationStage::ImageSearch => "image-search",
            GenerationStage::Publish => "publish",
        }
    }

    pub fn running_message(&self) -> &'static str {
        match self {
            GenerationStage::Outline => "Planning the outline...",
            GenerationStage::Draft => "Writing the draft...",
            GenerationStage::ImageSearch => "Looking for a cover image...",
            GenerationStage::Publish => "Saving the post as a draft...",
        }
    }
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.step_id())
    }
}
