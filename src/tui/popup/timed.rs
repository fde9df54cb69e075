/// Width of the volume bar in cells
const VOLUME_BAR_WIDTH: usize = 50;

/// Informational popup that closes itself after a delay
pub struct TimedPopup {
    title: String,
    text: String,
}

impl TimedPopup {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Render a volume in 0..=100 as a fixed-width bar
pub fn volume_bar(volume: u8) -> String {
    let volume = volume.min(100);
    let filled = usize::from(volume) * VOLUME_BAR_WIDTH / 100;
    format!(
        "\n{} |{}{}| 100",
        volume,
        "█".repeat(filled),
        "-".repeat(VOLUME_BAR_WIDTH - filled),
    )
}
