//! Row actions dispatched through `data-action` attributes

/// What a click on a table control asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Send,
    Remove,
    Modify,
    Split,
    Reserve,
    Ping,
}

impl RowAction {
    pub const SEND: &'static str = "send";
    pub const REMOVE: &'static str = "remove";
    pub const MODIFY: &'static str = "modify";
    pub const SPLIT: &'static str = "split";
    pub const RESERVE: &'static str = "reserve";
    pub const PING: &'static str = "ping";

    pub fn as_str(self) -> &'static str {
        match self {
            RowAction::Send => Self::SEND,
            RowAction::Remove => Self::REMOVE,
            RowAction::Modify => Self::MODIFY,
            RowAction::Split => Self::SPLIT,
            RowAction::Reserve => Self::RESERVE,
            RowAction::Ping => Self::PING,
        }
    }

    /// Decode a `data-action` / `data-row` pair. Anything unrecognised,
    /// including a row that is not a positive integer, yields `None`.
    pub fn parse(action: &str, row: &str) -> Option<(RowAction, usize)> {
        let action = match action {
            Self::SEND => RowAction::Send,
            Self::REMOVE => RowAction::Remove,
            Self::MODIFY => RowAction::Modify,
            Self::SPLIT => RowAction::Split,
            Self::RESERVE => RowAction::Reserve,
            Self::PING => RowAction::Ping,
            _ => return None,
        };
        let position = row.trim().parse::<usize>().ok().filter(|p| *p > 0)?;
        Some((action, position))
    }
}
