//! Inline search spinner

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner shown in the search button while a request is in flight
pub struct Spinner;

impl Spinner {
    /// Character for the given frame
    pub fn char_at(frame: usize) -> char {
        SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }

    /// Button label while searching
    pub fn label(frame: usize) -> String {
        format!("{} Searching...", Self::char_at(frame))
    }
}
