//! The four-way choice offered after each draft.

/// Options of the post-draft menu, numbered 1 to 4 in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Commit,
    Regenerate,
    Edit,
    Cancel,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 4] = [
        MenuChoice::Commit,
        MenuChoice::Regenerate,
        MenuChoice::Edit,
        MenuChoice::Cancel,
    ];

    /// Parse a typed answer. Anything but `1`-`4` is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Commit),
            "2" => Some(MenuChoice::Regenerate),
            "3" => Some(MenuChoice::Edit),
            "4" => Some(MenuChoice::Cancel),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            MenuChoice::Commit => 1,
            MenuChoice::Regenerate => 2,
            MenuChoice::Edit => 3,
            MenuChoice::Cancel => 4,
        }
    }
}
