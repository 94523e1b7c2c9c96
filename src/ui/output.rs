//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Also echo what each spinner is doing when there is no terminal.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Results, warnings and errors only: no hints, no spinners.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows diagnostic detail.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if this mode shows hint lines.
    pub fn shows_hints(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}
